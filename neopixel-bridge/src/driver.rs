//! Serial driver for the NeoPixel controller.
//!
//! The controller firmware reads ASCII lines; each line names the state to
//! switch to. Nothing is ever read back.

use std::io;

use bytes::{BufMut, BytesMut};
use futures::sink::SinkExt;
use tokio::io::AsyncWrite;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tokio_util::codec::{Encoder, FramedWrite};

use crate::error::Result;
use crate::message::StateCommand;
use crate::tracing::prelude::*;

/// Device the controller shows up as when plugged in over USB.
pub const DEFAULT_DEVICE: &str = "/dev/ttyACM0";

/// Baud rate the controller firmware listens at.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Encodes a state command as one line terminated by CR LF.
#[derive(Debug, Default)]
pub struct StateCodec;

impl Encoder<StateCommand> for StateCodec {
    type Error = io::Error;

    fn encode(
        &mut self,
        state: StateCommand,
        dst: &mut BytesMut,
    ) -> std::result::Result<(), Self::Error> {
        const TERMINATOR: &[u8] = b"\r\n";
        dst.reserve(state.as_str().len() + TERMINATOR.len());
        dst.put_slice(state.as_str().as_bytes());
        dst.put_slice(TERMINATOR);
        Ok(())
    }
}

/// Handle to the LED controller.
///
/// Owns the connection for as long as it lives. There is no close; dropping
/// the handle drops the port.
pub struct NeoPixel<W = SerialStream> {
    framed: FramedWrite<W, StateCodec>,
}

impl NeoPixel<SerialStream> {
    /// Open the controller at `path`, 8N1 at `baud_rate`.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = tokio_serial::new(path, baud_rate).open_native_async()?;
        info!(device = path, baud_rate, "Opened serial port.");
        Ok(Self::new(port))
    }
}

impl<W: AsyncWrite + Unpin> NeoPixel<W> {
    /// Drive a controller over an already open writer.
    pub fn new(writer: W) -> Self {
        Self {
            framed: FramedWrite::new(writer, StateCodec),
        }
    }

    /// Write `state` followed by CR LF and flush it to the port.
    ///
    /// On failure, whatever part of the line was not written is dropped so
    /// it cannot go out ahead of the next state.
    pub async fn set_state(&mut self, state: StateCommand) -> Result<()> {
        trace!(state = %state, "Writing state.");
        if let Err(e) = self.framed.send(state).await {
            self.framed.write_buffer_mut().clear();
            return Err(e.into());
        }
        Ok(())
    }
}

/// In-memory serial port whose first write fails.
#[cfg(test)]
pub(crate) mod test_port {
    use std::io;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    use tokio::io::AsyncWrite;

    /// Fails the first `poll_write`, then records every byte written.
    pub(crate) struct FailOncePort {
        failed: bool,
        written: Arc<Mutex<Vec<u8>>>,
    }

    impl FailOncePort {
        pub(crate) fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let written = Arc::new(Mutex::new(Vec::new()));
            let port = Self {
                failed: false,
                written: written.clone(),
            };
            (port, written)
        }
    }

    impl AsyncWrite for FailOncePort {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            if !self.failed {
                self.failed = true;
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "device unplugged",
                )));
            }
            self.written.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn encode(state: &str) -> BytesMut {
        let mut frame = BytesMut::new();
        StateCodec.encode(StateCommand::from(state), &mut frame).unwrap();
        frame
    }

    #[test]
    fn test_encode_appends_crlf() {
        assert_eq!(&encode("rainbow")[..], b"rainbow\r\n");
        assert_eq!(&encode("iss_alarm")[..], b"iss_alarm\r\n");
    }

    #[test]
    fn test_encode_empty_state() {
        assert_eq!(&encode("")[..], b"\r\n");
    }

    #[test]
    fn test_encode_is_verbatim() {
        assert_eq!(&encode("Color 255,0,0")[..], b"Color 255,0,0\r\n");
    }

    #[tokio::test]
    async fn test_set_state_writes_exact_bytes() {
        let (port, mut device) = tokio::io::duplex(256);
        let mut pixel = NeoPixel::new(port);

        pixel.set_state("rainbow".into()).await.unwrap();
        drop(pixel);

        let mut received = Vec::new();
        device.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"rainbow\r\n");
    }

    #[tokio::test]
    async fn test_set_state_twice_writes_twice() {
        let (port, mut device) = tokio::io::duplex(256);
        let mut pixel = NeoPixel::new(port);

        pixel.set_state("blink".into()).await.unwrap();
        pixel.set_state("blink".into()).await.unwrap();
        drop(pixel);

        let mut received = Vec::new();
        device.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"blink\r\nblink\r\n");
    }

    #[tokio::test]
    async fn test_set_state_fails_when_device_gone() {
        let (port, device) = tokio::io::duplex(256);
        drop(device);
        let mut pixel = NeoPixel::new(port);

        assert!(pixel.set_state("rainbow".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_write_is_not_resent() {
        let (port, written) = test_port::FailOncePort::new();
        let mut pixel = NeoPixel::new(port);

        assert!(pixel.set_state("rainbow".into()).await.is_err());
        pixel.set_state("off".into()).await.unwrap();

        assert_eq!(*written.lock().unwrap(), b"off\r\n");
    }

    #[test]
    fn test_open_missing_device() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();
        assert!(NeoPixel::open("/dev/neopixel-does-not-exist", DEFAULT_BAUD_RATE).is_err());
    }
}

//! UART transport for the command stream.
//!
//! # Pins
//!
//! Uses UART1 by default:
//! - GPIO 8: TX (replies to the host)
//! - GPIO 9: RX (command input)

use embassy_rp::uart::{Async, Error as UartError, UartRx, UartTx};
use switchbot_core::{ByteSource, InputError, OutputError, ReplySink};

/// Baud rate of the host link (8N1).
pub const BAUD_RATE: u32 = 9600;

/// Convert UART errors to [`InputError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `UartError` and `InputError` are defined in external crates).
#[inline]
fn uart_error_to_input_error(e: UartError) -> InputError {
    match e {
        UartError::Framing => InputError::Framing,
        UartError::Overrun => InputError::Overrun,
        UartError::Break => InputError::Break,
        _ => InputError::Io,
    }
}

/// Byte source reading from the UART receiver.
pub struct UartByteSource<'d> {
    rx: UartRx<'d, Async>,
}

impl<'d> UartByteSource<'d> {
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>) -> Self {
        Self { rx }
    }
}

impl ByteSource for UartByteSource<'_> {
    async fn read_byte(&mut self) -> Result<u8, InputError> {
        let mut byte = [0u8; 1];
        self.rx
            .read(&mut byte)
            .await
            .map_err(uart_error_to_input_error)?;
        Ok(byte[0])
    }
}

/// Reply sink writing to the UART transmitter.
pub struct UartReply<'d> {
    tx: UartTx<'d, Async>,
}

impl<'d> UartReply<'d> {
    #[must_use]
    pub fn new(tx: UartTx<'d, Async>) -> Self {
        Self { tx }
    }
}

impl ReplySink for UartReply<'_> {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.tx.write(bytes).await.map_err(|_| OutputError::Io)
    }
}

//! Serial command stream to Switch-compatible USB controller for RP2040.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives line-oriented commands over UART (9600 baud, 8N1)
//! 2. Executes them against an emulated HORIPAD controller
//! 3. Sends the resulting state as USB HID reports
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Version replies and acknowledgements |
//! | UART1 RX | 9    | Command input |
//! | LED      | 25   | On-board LED (lit once initialized) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with three concurrent tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Command Task**: Frames UART bytes into lines and executes them
//! - **Output Task**: Receives report signals and sends USB HID reports
//!
//! Communication between tasks uses Embassy's [`Signal`](embassy_sync::signal::Signal)
//! with "latest value wins" semantics, so the USB output always reflects the
//! most recent controller state.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`ack-responses`**: Answer every line with `.` (accepted) or `-` (rejected)

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they install conflicting panic handlers");

pub mod uart;
pub mod usb_output;

use switchbot_core::{ExecutorConfig, DEFAULT_CONFIG};

pub use uart::{UartByteSource, UartReply, BAUD_RATE};
pub use usb_output::{
    configure_usb_hid, ReportSignal, SignalingDevice, SwitchRequestHandler, UsbHidOutput,
    REPORT_DESCRIPTOR, USB_PID, USB_VID,
};

/// Executor configuration selected by the enabled features.
pub const EXECUTOR_CONFIG: ExecutorConfig =
    DEFAULT_CONFIG.with_acknowledge(cfg!(feature = "ack-responses"));

//! USB HID controller output.

use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::Builder;
use switchbot_core::{Axis, ButtonId, ControllerDevice, HatDirection, OutputError, SwitchReport};

/// USB vendor ID (HORI).
pub const USB_VID: u16 = 0x0F0D;
/// USB product ID (HORIPAD for Nintendo Switch).
pub const USB_PID: u16 = 0x0092;

/// Latest report to send, shared between the command and output tasks.
pub type ReportSignal = Signal<CriticalSectionRawMutex, SwitchReport>;

type UsbDriver<'d> = Driver<'d, USB>;

/// HORIPAD-compatible HID Report Descriptor.
///
/// This descriptor defines a controller with:
/// - 16 buttons (14 used)
/// - 1 hat switch (8 directions + null state)
/// - 4 axes (X/Y left stick, Z/Rz right stick, unsigned 8-bit)
/// - 1 vendor-defined byte
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (16 buttons) ---
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x35, 0x00, //   Physical Minimum (0)
    0x45, 0x01, //   Physical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x10, //   Report Count (16)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x10, //   Usage Maximum (Button 16)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Hat switch ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x25, 0x07, //   Logical Maximum (7)
    0x46, 0x3B, 0x01, //   Physical Maximum (315)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x65, 0x14, //   Unit (Degrees)
    0x09, 0x39, //   Usage (Hat switch)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant) - padding
    //
    // --- Sticks ---
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x46, 0xFF, 0x00, //   Physical Maximum (255)
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x09, 0x35, //   Usage (Rz)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Vendor byte ---
    0x06, 0x00, 0xFF, //   Usage Page (Vendor Defined)
    0x09, 0x20, //   Usage (0x20)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    // --- Output report ---
    0x0A, 0x21, 0x26, //   Usage (0x2621)
    0x95, 0x08, //   Report Count (8)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// Controller device that keeps the current report and publishes every change.
pub struct SignalingDevice<'a> {
    report: SwitchReport,
    signal: &'a ReportSignal,
}

impl<'a> SignalingDevice<'a> {
    #[must_use]
    pub fn new(signal: &'a ReportSignal) -> Self {
        Self {
            report: SwitchReport::neutral(),
            signal,
        }
    }

    /// Current report.
    #[inline]
    #[must_use]
    pub fn report(&self) -> &SwitchReport {
        &self.report
    }

    fn publish(&self) {
        self.signal.signal(self.report);
    }
}

impl ControllerDevice for SignalingDevice<'_> {
    fn press_button(&mut self, button: ButtonId) {
        self.report.press_button(button);
        self.publish();
    }

    fn release_button(&mut self, button: ButtonId) {
        self.report.release_button(button);
        self.publish();
    }

    fn set_hat(&mut self, direction: HatDirection) {
        self.report.set_hat(direction);
        self.publish();
    }

    fn set_axis(&mut self, axis: Axis, value: u8) {
        self.report.set_axis(axis, value);
        self.publish();
    }
}

/// USB HID controller output.
///
/// Wraps an embassy-usb HID writer to send controller reports.
pub struct UsbHidOutput<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, { SwitchReport::SIZE }>,
}

impl<'d> UsbHidOutput<'d> {
    /// Create a new USB HID output from the given HID writer.
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, { SwitchReport::SIZE }>) -> Self {
        Self { writer }
    }

    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
    }

    /// Send one report to the host.
    pub async fn send(&mut self, report: &SwitchReport) -> Result<(), OutputError> {
        self.writer
            .write(&report.as_bytes())
            .await
            .map_err(|_| OutputError::Io)
    }
}

/// HID request handler (handles SET_REPORT, etc.).
///
/// The console's output reports (rumble, LEDs) are accepted and ignored.
pub struct SwitchRequestHandler;

impl RequestHandler for SwitchRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, _id: ReportId, _data: &[u8]) -> OutResponse {
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
    request_handler: &'d mut SwitchRequestHandler,
) -> HidWriter<'d, UsbDriver<'d>, { SwitchReport::SIZE }> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms: 1,
        max_packet_size: 64,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}

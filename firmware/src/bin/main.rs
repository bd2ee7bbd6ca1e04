#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART1, USB};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_rp::usb::Driver;
use embassy_time::Delay;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;
use switchbot_core::{CommandBridge, CommandExecutor};
use switchbot_firmware::{
    configure_usb_hid, ReportSignal, SignalingDevice, SwitchRequestHandler, UartByteSource,
    UartReply, UsbHidOutput, BAUD_RATE, EXECUTOR_CONFIG, USB_PID, USB_VID,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

type Bridge = CommandBridge<
    UartByteSource<'static>,
    SignalingDevice<'static>,
    UartReply<'static>,
    Delay,
>;

/// Latest controller report, from the command task to the output task.
static REPORT_SIGNAL: StaticCell<ReportSignal> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<SwitchRequestHandler> = StaticCell::new();

/// Status LED, kept alive for the lifetime of the firmware.
static STATUS_LED: StaticCell<Output<'static>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("SwitchBot controller starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let signal: &'static ReportSignal = REPORT_SIGNAL.init(ReportSignal::new());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;

    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (tx, rx) = uart.split();

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(USB_VID, USB_PID);
    usb_config.manufacturer = Some("HORI CO.,LTD.");
    usb_config.product = Some("HORIPAD S");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    let hid_state = HID_STATE.init(State::new());
    let request_handler = REQUEST_HANDLER.init(SwitchRequestHandler);
    let hid_writer = configure_usb_hid(&mut builder, hid_state, request_handler);

    let usb_device = builder.build();
    let usb_output = UsbHidOutput::new(hid_writer);

    // --- Command pipeline ---
    let mut executor = CommandExecutor::with_config(
        SignalingDevice::new(signal),
        UartReply::new(tx),
        Delay,
        EXECUTOR_CONFIG,
    );
    executor.reset_device();
    let bridge = CommandBridge::new(UartByteSource::new(rx), executor);

    // Status LED: lit once setup is complete
    STATUS_LED.init(Output::new(p.PIN_25, Level::High));

    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(command_task(bridge).unwrap());
    spawner.spawn(output_task(usb_output, signal).unwrap());

    info!("SwitchBot controller initialized, waiting for commands...");
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Command task - frames UART bytes into lines and executes them.
#[embassy_executor::task]
async fn command_task(mut bridge: Bridge) {
    bridge.run().await
}

/// Output task - waits for report signals and sends them over USB HID.
#[embassy_executor::task]
async fn output_task(mut output: UsbHidOutput<'static>, signal: &'static ReportSignal) {
    output.wait_ready().await;
    info!("USB HID ready, forwarding controller reports...");

    loop {
        let report = signal.wait().await;
        if let Err(e) = output.send(&report).await {
            error!("Output error: {:?}", e);
        }
    }
}

use image::RgbImage;
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::hal::Delay;
use rppal::spi::{Bus, Mode, SimpleHalSpiDevice, SlaveSelect, Spi};
use ssd1677::{Builder, Dimensions, Display, Interface, RefreshMode, Rotation};
use crate::config::DisplayConfig;
use crate::manager_eink::FrameSink;
use crate::manager_eink::errors::EinkError;

const SPI_CLOCK_HZ: u32 = 4_000_000;

/// Luma cutoff between black and white when quantizing the frame
const LUMA_THRESHOLD: u32 = 128;

type PanelInterface = Interface<SimpleHalSpiDevice, OutputPin, OutputPin, InputPin>;

/// Sink driving an SSD1677 e-paper panel over SPI. The panel is wired
/// portrait (gate x source), the frame arrives landscape and is mapped
/// through the driver's rotation support.
pub struct Ssd1677Sink {
    display: Display<PanelInterface>,
    delay: Delay,
    buffer: Vec<u8>,
    width: u32,
    height: u32,
}

impl Ssd1677Sink {
    /// Opens the SPI bus and GPIO lines and resets the panel. Any
    /// failure here means no display is attached and the caller falls
    /// back to the no-op sink.
    ///
    /// # Arguments
    ///
    /// * 'config' - the display configuration section
    pub fn open(config: &DisplayConfig) -> Result<Ssd1677Sink, EinkError> {
        let bus = match config.spi_bus {
            0 => Bus::Spi0,
            1 => Bus::Spi1,
            b => return Err(EinkError(format!("unsupported spi bus {}", b))),
        };

        let spi = Spi::new(bus, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)
            .map_err(|e| EinkError(format!("spi open: {}", e)))?;
        let spi = SimpleHalSpiDevice::new(spi);

        let gpio = Gpio::new().map_err(|e| EinkError(format!("gpio open: {}", e)))?;
        let dc = gpio.get(config.dc_pin)
            .map_err(|e| EinkError(format!("dc pin {}: {}", config.dc_pin, e)))?
            .into_output();
        let rst = gpio.get(config.reset_pin)
            .map_err(|e| EinkError(format!("reset pin {}: {}", config.reset_pin, e)))?
            .into_output();
        let busy = gpio.get(config.busy_pin)
            .map_err(|e| EinkError(format!("busy pin {}: {}", config.busy_pin, e)))?
            .into_input();

        let interface = Interface::new(spi, dc, rst, busy);

        let dims = Dimensions::new(config.height as u16, config.width as u16)
            .map_err(|e| EinkError(format!("panel dimensions: {:?}", e)))?;
        let panel_config = Builder::new()
            .dimensions(dims)
            .rotation(Rotation::Rotate270)
            .build()
            .map_err(|e| EinkError(format!("panel config: {:?}", e)))?;

        let mut display = Display::new(interface, panel_config);
        let mut delay = Delay::new();
        display.reset(&mut delay)
            .map_err(|e| EinkError(format!("panel reset: {:?}", e)))?;

        let buffer = vec![0u8; (config.width * config.height / 8) as usize];

        Ok(Ssd1677Sink {
            display,
            delay,
            buffer,
            width: config.width,
            height: config.height,
        })
    }

    /// Quantizes the RGB frame to the 1-bit panel buffer, one bit per
    /// pixel, msb first within each byte
    ///
    /// # Arguments
    ///
    /// * 'frame' - frame at the panel's native resolution
    fn pack_frame(&mut self, frame: &RgbImage) {
        self.buffer.fill(0);

        for (x, y, pixel) in frame.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
            if luma >= LUMA_THRESHOLD {
                let index = (y * self.width + x) as usize;
                self.buffer[index / 8] |= 0x80 >> (index % 8);
            }
        }
    }
}

impl FrameSink for Ssd1677Sink {
    fn name(&self) -> &'static str {
        "ssd1677"
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn show(&mut self, frame: &RgbImage) -> Result<(), EinkError> {
        self.pack_frame(frame);

        self.display.update_frame(&self.buffer)
            .map_err(|e| EinkError(format!("frame update: {:?}", e)))?;
        self.display.refresh(RefreshMode::Full, &mut self.delay)
            .map_err(|e| EinkError(format!("panel refresh: {:?}", e)))?;

        Ok(())
    }
}

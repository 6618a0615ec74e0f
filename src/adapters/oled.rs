//! SSD1306 64x48 OLED adapter.
//!
//! Implements [`DisplayPort`] with a buffered `ssd1306` driver and the
//! 6x10 mono font.  Text is positioned by its top-left corner, matching
//! the page layout in [`crate::display`].

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::{info, warn};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use super::SharedI2c;
use crate::app::ports::DisplayPort;
use crate::error::Error;

type Panel = Ssd1306<I2CInterface<SharedI2c>, DisplaySize64x48, BufferedGraphicsMode<DisplaySize64x48>>;

pub struct OledDisplay {
    panel: Panel,
}

impl OledDisplay {
    pub fn new(i2c: SharedI2c) -> Result<Self, Error> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut panel = Ssd1306::new(interface, DisplaySize64x48, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().map_err(|e| {
            warn!("oled: init failed: {:?}", e);
            Error::Init("SSD1306")
        })?;
        // Start dark; the page cycle powers the panel on when needed.
        if let Err(e) = panel.set_display_on(false) {
            warn!("oled: power off failed: {:?}", e);
        }
        info!("oled: ready (64x48)");
        Ok(Self { panel })
    }
}

impl DisplayPort for OledDisplay {
    fn clear(&mut self) {
        let _ = DrawTarget::clear(&mut self.panel, BinaryColor::Off);
    }

    fn text(&mut self, x: i32, y: i32, text: &str) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        if let Err(e) = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut self.panel) {
            warn!("oled: draw failed: {:?}", e);
        }
    }

    fn show(&mut self) {
        if let Err(e) = self.panel.flush() {
            warn!("oled: flush failed: {:?}", e);
        }
    }

    fn power_on(&mut self) {
        if let Err(e) = self.panel.set_display_on(true) {
            warn!("oled: power on failed: {:?}", e);
        }
    }

    fn power_off(&mut self) {
        if let Err(e) = self.panel.set_display_on(false) {
            warn!("oled: power off failed: {:?}", e);
        }
    }
}

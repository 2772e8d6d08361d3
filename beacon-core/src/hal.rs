//! Hardware Abstraction Layer for the beacon: time, output lamps, status display

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::Duration;

#[cfg(not(feature = "embassy-time"))]
pub use self::millis::Duration;

#[cfg(not(feature = "embassy-time"))]
mod millis {
    /// Millisecond duration for builds without embassy-time
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn from_secs(secs: u64) -> Self {
            Self(secs.saturating_mul(1000))
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    // Arithmetic saturates instead of wrapping or panicking
    impl core::ops::Div<u32> for Duration {
        type Output = Duration;

        fn div(self, rhs: u32) -> Duration {
            Duration(self.0 / rhs as u64)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0.saturating_mul(rhs as u64))
        }
    }

    impl core::ops::Add for Duration {
        type Output = Duration;

        fn add(self, rhs: Duration) -> Duration {
            Duration(self.0.saturating_add(rhs.0))
        }
    }

    impl core::ops::AddAssign for Duration {
        fn add_assign(&mut self, rhs: Duration) {
            self.0 = self.0.saturating_add(rhs.0);
        }
    }
}

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use crate::types::Channel;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Display write failed
    DisplayError,
    /// Timing operation failed
    TimingError,
    /// Hardware not initialized
    NotInitialized,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::DisplayError => write!(f, "Display write failed"),
            HalError::TimingError => write!(f, "Timing operation failed"),
            HalError::NotInitialized => write!(f, "Hardware not initialized"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Physical rendering of dot/dash units (lamps, LEDs, a key line)
pub trait SignalOutput {
    type Error: From<HalError> + core::fmt::Debug;

    /// Turn the indicator for `channel` on
    fn activate(&mut self, channel: Channel) -> Result<(), Self::Error>;

    /// Turn the indicator for `channel` off
    fn deactivate(&mut self, channel: Channel) -> Result<(), Self::Error>;
}

/// Human-readable status surface (a character LCD, a terminal)
pub trait StatusDisplay {
    type Error: From<HalError> + core::fmt::Debug;

    /// Replace the display contents with `text` (may contain `\n`)
    fn render(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Blank the display
    fn clear(&mut self) -> Result<(), Self::Error>;
}

impl<T: SignalOutput + ?Sized> SignalOutput for &mut T {
    type Error = T::Error;

    fn activate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        T::activate(self, channel)
    }

    fn deactivate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        T::deactivate(self, channel)
    }
}

impl<T: StatusDisplay + ?Sized> StatusDisplay for &mut T {
    type Error = T::Error;

    fn render(&mut self, text: &str) -> Result<(), Self::Error> {
        T::render(self, text)
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        T::clear(self)
    }
}

/// Two embedded-hal output pins, one per channel
pub struct EmbeddedHalSignalOutput<PDot, PDash> {
    dot_pin: PDot,
    dash_pin: PDash,
    inverted: bool,
}

impl<PDot, PDash> EmbeddedHalSignalOutput<PDot, PDash>
where
    PDot: OutputPin,
    PDash: OutputPin,
{
    pub fn new(dot_pin: PDot, dash_pin: PDash, inverted: bool) -> Self {
        Self { dot_pin, dash_pin, inverted }
    }

    /// Drive both indicators off
    pub fn release(&mut self) -> Result<(), HalError> {
        self.deactivate(Channel::Dot)?;
        self.deactivate(Channel::Dash)
    }

    /// Give the pins back
    pub fn free(self) -> (PDot, PDash) {
        (self.dot_pin, self.dash_pin)
    }

    fn drive(&mut self, channel: Channel, on: bool) -> Result<(), HalError> {
        let level = if self.inverted { !on } else { on };
        match (channel, level) {
            (Channel::Dot, true) => self.dot_pin.set_high().map_err(|_| HalError::GpioError),
            (Channel::Dot, false) => self.dot_pin.set_low().map_err(|_| HalError::GpioError),
            (Channel::Dash, true) => self.dash_pin.set_high().map_err(|_| HalError::GpioError),
            (Channel::Dash, false) => self.dash_pin.set_low().map_err(|_| HalError::GpioError),
        }
    }
}

impl<PDot, PDash> SignalOutput for EmbeddedHalSignalOutput<PDot, PDash>
where
    PDot: OutputPin,
    PDash: OutputPin,
{
    type Error = HalError;

    fn activate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.drive(channel, true)
    }

    fn deactivate(&mut self, channel: Channel) -> Result<(), Self::Error> {
        self.drive(channel, false)
    }
}

/// Output that renders nothing
pub struct NoOpOutput;

impl SignalOutput for NoOpOutput {
    type Error = HalError;

    fn activate(&mut self, _channel: Channel) -> Result<(), Self::Error> {
        Ok(())
    }

    fn deactivate(&mut self, _channel: Channel) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Display that shows nothing
pub struct NoOpDisplay;

impl StatusDisplay for NoOpDisplay {
    type Error = HalError;

    fn render(&mut self, _text: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Blocking hold backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

/// Hold the current thread for `duration` through any `DelayNs`
///
/// `DelayNs` takes a `u32` of milliseconds; longer durations are clamped.
pub fn hold<D: DelayNs + ?Sized>(delay: &mut D, duration: Duration) {
    let ms = match u32::try_from(duration.as_millis()) {
        Ok(ms) => ms,
        Err(_) => {
            warn!("Hold: {} ms exceeds the delay limit, clamped", duration.as_millis());
            u32::MAX
        }
    };
    delay.delay_ms(ms);
}

// Copyright 2023 The stm32f30x-ports authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # General Purpose Input / Output
//!
//! Every physical port is a zero-sized type, [`Port<I>`], whose associated
//! functions operate on the port as a whole. Pins are selected with a 16-bit
//! mask, bit `i` standing for pin `i`, so one call can reconfigure any subset
//! of the port with a single register write:
//!
//! ```no_run
//! use stm32f30x_ports::gpio::{Configuration, Porta, Speed};
//!
//! Porta::enable();
//! Porta::set_configuration(0x0003, Configuration::Out);
//! Porta::set_speed(0x0003, Speed::Fastest);
//! Porta::set(0x0001);
//! ```
//!
//! Individual pins can also be taken as typed [`Pin`] handles, which implement
//! the `embedded-hal` digital traits.
//!
//! ## Concurrency
//!
//! [`Port::set`], [`Port::clear`] and [`Port::clear_and_set`] go through the
//! write-only set/reset register and may be used from several contexts on
//! disjoint pins. Everything else is a read-modify-write of a shared register
//! and must be serialized by the caller.

use core::convert::Infallible;
use core::marker::PhantomData;

use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

use crate::bits::{pack_field1, pack_field2, pack_field4};
use crate::rcc::{
    ClockGate, GpioaClock, GpiobClock, GpiocClock, GpiodClock, GpioeClock, GpiofClock,
};
use crate::regs::RegisterBlock;

/// Pin mode, 2 bits per pin in `MODER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Configuration {
    Analog = 3,
    In = 0,
    Out = 1,
    AltFunc = 2,
}

/// Internal pull resistor, 2 bits per pin in `PUPDR`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PullMode {
    NoPullUp = 0,
    PullUp = 1,
    PullDown = 2,
}

/// Output driver, 1 bit per pin in `OTYPER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverType {
    PushPull = 0,
    OpenDrain = 1,
}

/// Output slew rate, 2 bits per pin in `OSPEEDR`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Slow = 0,
    Fast = 1,
    Fastest = 2,
}

/// A physical GPIO port: its identity, registers and clock.
pub trait PortInstance {
    /// Port letter, `'A'` for GPIOA.
    const ID: char;

    /// Clock gate of the port.
    type Clock: ClockGate;

    /// Register block of the port.
    fn regs() -> &'static RegisterBlock;
}

/// Number of pins in a port.
pub const WIDTH: u8 = 16;

/// Mask of pin `N`. Evaluating it for `N >= WIDTH` fails to compile.
struct PinMask<const N: u8>;

impl<const N: u8> PinMask<N> {
    const MASK: u16 = {
        assert!(N < WIDTH, "pin index out of range");
        1 << N
    };
}

/// Port interface, see the [module documentation](self).
pub struct Port<I> {
    _instance: PhantomData<I>,
}

impl<I: PortInstance> Port<I> {
    /// Port letter.
    pub const ID: char = I::ID;

    /// Number of pins.
    pub const WIDTH: u8 = WIDTH;

    #[inline(always)]
    fn regs() -> &'static RegisterBlock {
        I::regs()
    }

    /// Returns the state the port is driving, from the output data register.
    #[inline]
    pub fn read() -> u16 {
        Self::regs().odr.read() as u16
    }

    /// Replaces the output state of every pin.
    #[inline]
    pub fn write(value: u16) {
        Self::regs().odr.write(value.into());
    }

    /// Drives the pins in `mask` high.
    #[inline]
    pub fn set(mask: u16) {
        Self::regs().bsrr.write(mask.into());
    }

    /// Drives the pins in `mask` low.
    #[inline]
    pub fn clear(mask: u16) {
        Self::regs().bsrr.write(u32::from(mask) << 16);
    }

    /// Drives the pins in `clear_mask` low and the pins in `set_mask` high with
    /// one write. A pin in both masks ends up high.
    #[inline]
    pub fn clear_and_set(clear_mask: u16, set_mask: u16) {
        Self::regs()
            .bsrr
            .write(u32::from(set_mask) | u32::from(clear_mask) << 16);
    }

    /// Inverts the output state of the pins in `mask`.
    #[inline]
    pub fn toggle(mask: u16) {
        Self::regs().odr.modify(|r| r ^ u32::from(mask));
    }

    /// Returns the electrical level of every pin, from the input data register.
    #[inline]
    pub fn pin_read() -> u16 {
        Self::regs().idr.read() as u16
    }

    /// Sets the mode of pin `PIN`.
    ///
    /// `PIN` must be below [`WIDTH`]; anything else fails to compile:
    ///
    /// ```compile_fail
    /// use stm32f30x_ports::gpio::{Configuration, Porta};
    ///
    /// Porta::set_pin_configuration::<16>(Configuration::Out);
    /// ```
    #[inline]
    pub fn set_pin_configuration<const PIN: u8>(configuration: Configuration) {
        Self::set_configuration(PinMask::<PIN>::MASK, configuration);
    }

    /// Sets the mode of the pins in `mask`.
    #[inline]
    pub fn set_configuration(mask: u16, configuration: Configuration) {
        Self::regs()
            .moder
            .modify(|r| pack_field2(mask, r, configuration as u32));
    }

    /// Sets the output speed of the pins in `mask`.
    #[inline]
    pub fn set_speed(mask: u16, speed: Speed) {
        Self::regs()
            .ospeedr
            .modify(|r| pack_field2(mask, r, speed as u32));
    }

    /// Sets the pull resistor of the pins in `mask`.
    #[inline]
    pub fn set_pull_up(mask: u16, pull: PullMode) {
        Self::regs()
            .pupdr
            .modify(|r| pack_field2(mask, r, pull as u32));
    }

    /// Sets the output driver of the pins in `mask`.
    #[inline]
    pub fn set_driver_type(mask: u16, driver: DriverType) {
        Self::regs()
            .otyper
            .modify(|r| pack_field1(mask, r, driver as u32));
    }

    /// Routes the pins in `mask` to alternate function `number` (`0..=15`).
    ///
    /// Pins 0-7 live in `AFR[0]` and pins 8-15 in `AFR[1]`; the low register is
    /// written first.
    pub fn alt_func_number(mask: u16, number: u8) {
        trace!("GPIO{}: AF{} on pins {:x}", I::ID, number, mask);
        let [low, high] = mask.to_le_bytes();
        let afr = &Self::regs().afr;
        afr[0].modify(|r| pack_field4(low, r, number.into()));
        afr[1].modify(|r| pack_field4(high, r, number.into()));
    }

    /// Starts the port clock.
    pub fn enable() {
        debug!("GPIO{}: clock enabled", I::ID);
        I::Clock::enable();
    }

    /// Stops the port clock.
    pub fn disable() {
        debug!("GPIO{}: clock disabled", I::ID);
        I::Clock::disable();
    }

    /// Returns a handle to pin `N`.
    ///
    /// `N` must be below [`WIDTH`]; anything else fails to compile:
    ///
    /// ```compile_fail
    /// use stm32f30x_ports::gpio::Porta;
    ///
    /// let _pin = Porta::pin::<16>();
    /// ```
    #[inline]
    pub fn pin<const N: u8>() -> Pin<I, N> {
        Pin::new()
    }
}

/// Where a pin handle sits: its index within the port and the port's index.
pub trait PinExt {
    /// Index of the pin within its port, `0..16`.
    fn pin_id(&self) -> u8;

    /// Index of the port, counting from 0 for port A.
    fn port_id(&self) -> u8;
}

/// Pin `N` of port `I`.
pub struct Pin<I, const N: u8> {
    _port: PhantomData<I>,
}

impl<I: PortInstance, const N: u8> Pin<I, N> {
    const MASK: u16 = PinMask::<N>::MASK;

    fn new() -> Self {
        let _ = Self::MASK;
        Self {
            _port: PhantomData,
        }
    }

    /// Drives the pin high.
    #[inline]
    pub fn set_high(&mut self) {
        // NOTE atomic write to a stateless register
        Port::<I>::set(Self::MASK)
    }

    /// Drives the pin low.
    #[inline]
    pub fn set_low(&mut self) {
        // NOTE atomic write to a stateless register
        Port::<I>::clear(Self::MASK)
    }

    /// Whether the pin is driven high, from the output data register.
    #[inline]
    pub fn is_set_high(&self) -> bool {
        !self.is_set_low()
    }

    /// Whether the pin is driven low.
    #[inline]
    pub fn is_set_low(&self) -> bool {
        Port::<I>::read() & Self::MASK == 0
    }

    /// Whether the pin reads high, from the input data register.
    #[inline]
    pub fn is_high(&self) -> bool {
        !self.is_low()
    }

    /// Whether the pin reads low.
    #[inline]
    pub fn is_low(&self) -> bool {
        Port::<I>::pin_read() & Self::MASK == 0
    }

    /// Inverts the output with a set/reset write, leaving the other pins of
    /// the port alone.
    #[inline]
    pub fn toggle(&mut self) {
        if self.is_set_low() {
            self.set_high()
        } else {
            self.set_low()
        }
    }

    /// Sets the mode of the pin.
    #[inline]
    pub fn set_configuration(&mut self, configuration: Configuration) {
        Port::<I>::set_configuration(Self::MASK, configuration)
    }

    /// Sets the output speed of the pin.
    #[inline]
    pub fn set_speed(&mut self, speed: Speed) {
        Port::<I>::set_speed(Self::MASK, speed)
    }

    /// Sets the pull resistor of the pin.
    #[inline]
    pub fn set_pull(&mut self, pull: PullMode) {
        Port::<I>::set_pull_up(Self::MASK, pull)
    }

    /// Sets the output driver of the pin.
    #[inline]
    pub fn set_driver_type(&mut self, driver: DriverType) {
        Port::<I>::set_driver_type(Self::MASK, driver)
    }

    /// Selects alternate function `number` and switches the pin to
    /// [`Configuration::AltFunc`].
    pub fn set_alternate_function(&mut self, number: u8) {
        Port::<I>::alt_func_number(Self::MASK, number);
        self.set_configuration(Configuration::AltFunc);
    }
}

impl<I: PortInstance, const N: u8> PinExt for Pin<I, N> {
    #[inline(always)]
    fn pin_id(&self) -> u8 {
        N
    }

    #[inline(always)]
    fn port_id(&self) -> u8 {
        I::ID as u8 - b'A'
    }
}

impl<I: PortInstance, const N: u8> OutputPin for Pin<I, N> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_low();
        Ok(())
    }
}

impl<I: PortInstance, const N: u8> StatefulOutputPin for Pin<I, N> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_set_high())
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(self.is_set_low())
    }
}

impl<I: PortInstance, const N: u8> ToggleableOutputPin for Pin<I, N> {
    type Error = Infallible;

    #[inline(always)]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.toggle();
        Ok(())
    }
}

impl<I: PortInstance, const N: u8> InputPin for Pin<I, N> {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_high())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(self.is_low())
    }
}

macro_rules! gpio {
    ($($GPIOX:ident: ($Portx:ident, $port_id:literal, $address:literal, $Clock:ty),)+) => {
        $(
            #[doc = concat!("GPIO", $port_id)]
            pub struct $GPIOX;

            impl PortInstance for $GPIOX {
                const ID: char = $port_id;
                type Clock = $Clock;

                #[inline(always)]
                fn regs() -> &'static RegisterBlock {
                    // NOTE(unsafe) the port registers are always mapped at this address
                    unsafe { &*($address as *const RegisterBlock) }
                }
            }

            #[doc = concat!("Port ", $port_id)]
            pub type $Portx = Port<$GPIOX>;
        )+
    }
}

gpio!(
    GPIOA: (Porta, 'A', 0x4800_0000, GpioaClock),
    GPIOB: (Portb, 'B', 0x4800_0400, GpiobClock),
    GPIOC: (Portc, 'C', 0x4800_0800, GpiocClock),
    GPIOD: (Portd, 'D', 0x4800_0c00, GpiodClock),
    GPIOE: (Porte, 'E', 0x4800_1000, GpioeClock),
    GPIOF: (Portf, 'F', 0x4800_1400, GpiofClock),
);

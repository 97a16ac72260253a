use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;

/// Value returned for reads nothing drives.
pub const FLOATING_BUS: u8 = 0xA0;

bitflags! {
    /// What a card needs from the machine beyond its slot.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct CardCapabilities: u8 {
        /// The card claims whole pages of the CPU address space and must be
        /// registered as a page handler.
        const MEMORY_MAPPED_IO = 1 << 0;
    }
}

/// A window of 256-byte pages dispatched to one card.
pub trait PageHandler {
    /// First page (high address byte) handled, inclusive.
    fn start(&self) -> u8;
    /// Last page handled, inclusive.
    fn end(&self) -> u8;
    fn read(&mut self, page: u8, offset: u8) -> u8;
    fn write(&mut self, page: u8, offset: u8, value: u8);
}

/// A peripheral card that can be installed in an expansion slot.
///
/// Passive cards only implement `name`. The slot I/O hooks cover the
/// `$C0n0-$C0nF` device-select window and the `$Cn00-$CnFF` firmware page.
pub trait Card {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> CardCapabilities {
        CardCapabilities::empty()
    }

    /// Returns the page handler of a [`CardCapabilities::MEMORY_MAPPED_IO`]
    /// card. Must be `Some` exactly when that capability is set.
    fn page_handler(&mut self) -> Option<&mut dyn PageHandler> {
        None
    }

    fn io_read(&mut self, _offset: u8) -> u8 {
        FLOATING_BUS
    }

    fn io_write(&mut self, _offset: u8, _value: u8) {}

    fn rom_read(&mut self, _offset: u8) -> u8 {
        FLOATING_BUS
    }
}

/// Cards are shared between their slot and, for memory-mapped cards, the
/// CPU's page table.
pub type SharedCard = Rc<RefCell<dyn Card>>;

pub fn shared<C: Card + 'static>(card: C) -> Rc<RefCell<C>> {
    Rc::new(RefCell::new(card))
}

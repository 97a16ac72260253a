//! Expansion slot directory.
//!
//! The bus only records which card sits in which slot and forwards
//! memory-mapped cards to the CPU's page table. It does no address decoding
//! of its own.

use crate::card::{CardCapabilities, SharedCard};
use crate::cpu::Cpu;
use crate::NUM_SLOTS;

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("slot {slot} does not exist (valid slots are 0-{max})", max = NUM_SLOTS - 1)]
    SlotOutOfRange { slot: usize },
    #[error("card '{card}' does not support memory-mapped I/O")]
    NotMemoryMapped { card: &'static str },
}

#[derive(Default)]
pub struct Bus {
    slots: [Option<SharedCard>; NUM_SLOTS],
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `card` in `slot`.
    ///
    /// An existing occupant is replaced without error: the last attach wins.
    /// Callers relying on a slot being free must `query` first.
    pub fn attach(&mut self, slot: usize, card: SharedCard) -> Result<(), BusError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(BusError::SlotOutOfRange { slot })?;
        let name = card.borrow().name();
        if let Some(previous) = entry.replace(card) {
            log::debug!(
                "Slot {}: '{}' replaced by '{}'",
                slot,
                previous.borrow().name(),
                name
            );
        } else {
            log::debug!("Slot {}: '{}' installed", slot, name);
        }
        Ok(())
    }

    /// Returns the occupant of `slot`, or `None` when it is empty or out of
    /// range.
    pub fn query(&self, slot: usize) -> Option<SharedCard> {
        self.slots.get(slot).and_then(|entry| entry.clone())
    }

    /// Registers a memory-mapped card with the CPU's page table.
    pub fn register_page_handler(card: &SharedCard, cpu: &mut Cpu) -> Result<(), BusError> {
        let capabilities = card.borrow().capabilities();
        if !capabilities.contains(CardCapabilities::MEMORY_MAPPED_IO) {
            return Err(BusError::NotMemoryMapped {
                card: card.borrow().name(),
            });
        }
        cpu.add_page_handler(card.clone())
    }

    /// Iterates occupied slots in slot order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &SharedCard)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|card| (slot, card)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

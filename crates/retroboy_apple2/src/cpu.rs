use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::BusError;
use crate::card::{CardCapabilities, SharedCard};

/// Total addressable memory (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;
const NUM_PAGES: usize = MEMORY_SIZE >> 8;

/// Memory-facing side of the processing unit.
///
/// Instruction execution lives elsewhere; this owns the flat memory image
/// and the page table that routes accesses to memory-mapped cards.
pub struct Cpu {
    memory: Vec<u8>,
    /// Card owning each page, `None` for plain memory.
    pages: [Option<SharedCard>; NUM_PAGES],
}

pub type SharedCpu = Rc<RefCell<Cpu>>;

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
            pages: std::array::from_fn(|_| None),
        }
    }

    /// Copies `data` into memory starting at `addr`, truncating at the top
    /// of the address space.
    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        let len = data.len().min(MEMORY_SIZE - start);
        self.memory[start..start + len].copy_from_slice(&data[..len]);
    }

    /// Routes the card's page window to it. Later registrations win for
    /// overlapping pages.
    pub fn add_page_handler(&mut self, card: SharedCard) -> Result<(), BusError> {
        let (name, start, end) = {
            let mut guard = card.borrow_mut();
            let name = guard.name();
            if !guard.capabilities().contains(CardCapabilities::MEMORY_MAPPED_IO) {
                return Err(BusError::NotMemoryMapped { card: name });
            }
            let handler = guard
                .page_handler()
                .ok_or(BusError::NotMemoryMapped { card: name })?;
            (name, handler.start(), handler.end())
        };

        for page in start..=end {
            self.pages[page as usize] = Some(card.clone());
        }
        log::debug!("Page handler '{}' mapped ${:02X}00-${:02X}FF", name, start, end);
        Ok(())
    }

    /// Number of distinct cards currently mapped into the page table.
    pub fn handler_count(&self) -> usize {
        let mut mapped: Vec<&SharedCard> = Vec::new();
        for card in self.pages.iter().flatten() {
            if !mapped.iter().any(|seen| Rc::ptr_eq(seen, card)) {
                mapped.push(card);
            }
        }
        mapped.len()
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        let [offset, page] = addr.to_le_bytes();
        if let Some(card) = &self.pages[page as usize] {
            let mut card = card.borrow_mut();
            if let Some(handler) = card.page_handler() {
                return handler.read(page, offset);
            }
        }
        self.memory[addr as usize]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        let [offset, page] = addr.to_le_bytes();
        if let Some(card) = &self.pages[page as usize] {
            let mut card = card.borrow_mut();
            if let Some(handler) = card.page_handler() {
                handler.write(page, offset, value);
                return;
            }
        }
        self.memory[addr as usize] = value;
    }
}

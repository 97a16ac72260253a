use crate::card::Card;

/// Applied Engineering RAMFactor memory expansion.
///
/// Offsets 0-2 hold a 24-bit address (low, mid, high); offset 3 is the data
/// port, which advances the address after every access.
pub struct RamFactor {
    memory: Vec<u8>,
    address: u32,
}

impl RamFactor {
    pub fn new(size: usize) -> Self {
        Self {
            memory: vec![0; size],
            address: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.memory.len()
    }

    fn index(&self) -> usize {
        self.address as usize % self.memory.len().max(1)
    }

    fn step(&mut self) {
        self.address = (self.address + 1) & 0x00FF_FFFF;
    }
}

impl Card for RamFactor {
    fn name(&self) -> &'static str {
        "RAMFactor"
    }

    fn io_read(&mut self, offset: u8) -> u8 {
        match offset & 0x03 {
            3 => {
                let value = self.memory.get(self.index()).copied().unwrap_or(0);
                self.step();
                value
            }
            byte => (self.address >> (8 * byte)) as u8,
        }
    }

    fn io_write(&mut self, offset: u8, value: u8) {
        match offset & 0x03 {
            3 => {
                let index = self.index();
                if let Some(cell) = self.memory.get_mut(index) {
                    *cell = value;
                }
                self.step();
            }
            byte => {
                let shift = 8 * byte as u32;
                self.address = (self.address & !(0xFF << shift)) | ((value as u32) << shift);
            }
        }
    }
}

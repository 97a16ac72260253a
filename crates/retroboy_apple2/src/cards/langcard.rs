use crate::card::{Card, CardCapabilities, PageHandler};
use crate::rom::SYSTEM_ROM_SIZE;

const FIRST_PAGE: u8 = 0xD0;
const LAST_PAGE: u8 = 0xFF;
const BANK_SIZE: usize = 0x1000;
/// `$E000-$FFFF` is not banked.
const HIGH_RAM_SIZE: usize = 0x2000;

/// 16 KiB language card overlaying the system ROM at `$D000-$FFFF`.
///
/// Soft switches live at `$C080-$C08F`. Bit 3 of the offset selects bank 1
/// (set) or bank 2 (clear) for `$D000-$DFFF`; the low two bits select the
/// read source and write enable.
pub struct LanguageCard {
    rom: Vec<u8>,
    bank1: Vec<u8>,
    bank2: Vec<u8>,
    high_ram: Vec<u8>,
    read_ram: bool,
    write_ram: bool,
    bank2_selected: bool,
}

impl LanguageCard {
    /// Builds the card over a copy of the 12 KiB system ROM. Power-on state
    /// reads ROM with RAM write-protected.
    pub fn new(rom: &[u8]) -> Self {
        let mut image = vec![0; SYSTEM_ROM_SIZE];
        let len = rom.len().min(SYSTEM_ROM_SIZE);
        image[..len].copy_from_slice(&rom[..len]);
        Self {
            rom: image,
            bank1: vec![0; BANK_SIZE],
            bank2: vec![0; BANK_SIZE],
            high_ram: vec![0; HIGH_RAM_SIZE],
            read_ram: false,
            write_ram: false,
            bank2_selected: true,
        }
    }

    pub fn reads_ram(&self) -> bool {
        self.read_ram
    }

    pub fn writes_ram(&self) -> bool {
        self.write_ram
    }

    fn switch(&mut self, offset: u8) {
        self.bank2_selected = offset & 0x08 == 0;
        let mode = offset & 0x03;
        self.read_ram = mode == 0 || mode == 3;
        self.write_ram = mode & 0x01 != 0;
    }

    fn ram_mut(&mut self, addr: usize) -> &mut u8 {
        if addr < 0xE000 {
            let index = addr - 0xD000;
            if self.bank2_selected {
                &mut self.bank2[index]
            } else {
                &mut self.bank1[index]
            }
        } else {
            &mut self.high_ram[addr - 0xE000]
        }
    }
}

impl PageHandler for LanguageCard {
    fn start(&self) -> u8 {
        FIRST_PAGE
    }

    fn end(&self) -> u8 {
        LAST_PAGE
    }

    fn read(&mut self, page: u8, offset: u8) -> u8 {
        let addr = u16::from_le_bytes([offset, page]) as usize;
        if self.read_ram {
            *self.ram_mut(addr)
        } else {
            self.rom[addr - 0xD000]
        }
    }

    fn write(&mut self, page: u8, offset: u8, value: u8) {
        if self.write_ram {
            let addr = u16::from_le_bytes([offset, page]) as usize;
            *self.ram_mut(addr) = value;
        }
    }
}

impl Card for LanguageCard {
    fn name(&self) -> &'static str {
        "Language Card"
    }

    fn capabilities(&self) -> CardCapabilities {
        CardCapabilities::MEMORY_MAPPED_IO
    }

    fn page_handler(&mut self) -> Option<&mut dyn PageHandler> {
        Some(self)
    }

    fn io_read(&mut self, offset: u8) -> u8 {
        self.switch(offset);
        crate::card::FLOATING_BUS
    }

    fn io_write(&mut self, offset: u8, _value: u8) {
        self.switch(offset);
    }
}

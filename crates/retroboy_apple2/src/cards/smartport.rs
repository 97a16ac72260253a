use crate::card::{Card, FLOATING_BUS};
use crate::cpu::SharedCpu;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SmartPortOptions {
    /// Present as a plain ProDOS block device rather than a full SmartPort.
    pub block: bool,
}

/// SmartPort / ProDOS block device controller.
///
/// The firmware entry points trap into the host, which needs the CPU to read
/// the command block and write results back.
pub struct SmartPort {
    cpu: SharedCpu,
    options: SmartPortOptions,
}

impl SmartPort {
    pub fn new(cpu: SharedCpu, options: SmartPortOptions) -> Self {
        Self { cpu, options }
    }

    pub fn options(&self) -> SmartPortOptions {
        self.options
    }

    pub fn cpu(&self) -> &SharedCpu {
        &self.cpu
    }
}

impl Card for SmartPort {
    fn name(&self) -> &'static str {
        "SmartPort"
    }

    /// ProDOS identifies block devices by the bytes at `$Cn01/03/05/07`;
    /// `$Cn07 = $00` additionally advertises SmartPort.
    fn rom_read(&mut self, offset: u8) -> u8 {
        match offset {
            0x01 => 0x20,
            0x03 => 0x00,
            0x05 => 0x03,
            0x07 if self.options.block => 0x3C,
            0x07 => 0x00,
            _ => FLOATING_BUS,
        }
    }
}

use crate::card::Card;
use crate::config::SectorFormat;
use crate::machine::Clock;

/// Frontend hook for the drive activity lights.
pub trait DriveLights {
    fn set_light(&mut self, drive: u8, on: bool);
}

/// Drive lights that only log.
#[derive(Debug, Default)]
pub struct LogDriveLights;

impl DriveLights for LogDriveLights {
    fn set_light(&mut self, drive: u8, on: bool) {
        log::debug!("Drive {} light {}", drive, if on { "on" } else { "off" });
    }
}

/// Disk II controller with two drives.
///
/// Only motor and drive-select switches are handled; head stepping and
/// nibble I/O are left to the disk image layer.
pub struct DiskII {
    clock: Clock,
    lights: Box<dyn DriveLights>,
    sectors: SectorFormat,
    motor_on: bool,
    drive: u8,
    motor_started_at: u64,
}

impl DiskII {
    pub fn new(clock: Clock, lights: Box<dyn DriveLights>, sectors: SectorFormat) -> Self {
        Self {
            clock,
            lights,
            sectors,
            motor_on: false,
            drive: 1,
            motor_started_at: 0,
        }
    }

    pub fn sectors(&self) -> SectorFormat {
        self.sectors
    }

    pub fn motor_on(&self) -> bool {
        self.motor_on
    }

    pub fn selected_drive(&self) -> u8 {
        self.drive
    }

    /// CPU cycles since the motor was last switched on.
    pub fn motor_cycles(&self) -> u64 {
        if self.motor_on {
            self.clock.cycles().wrapping_sub(self.motor_started_at)
        } else {
            0
        }
    }

    fn switch(&mut self, offset: u8) {
        match offset & 0x0F {
            0x8 => {
                self.motor_on = false;
                self.lights.set_light(self.drive, false);
            }
            0x9 => {
                if !self.motor_on {
                    self.motor_started_at = self.clock.cycles();
                }
                self.motor_on = true;
                self.lights.set_light(self.drive, true);
            }
            0xA | 0xB => {
                let drive = if offset & 0x01 == 0 { 1 } else { 2 };
                if drive != self.drive && self.motor_on {
                    self.lights.set_light(self.drive, false);
                    self.lights.set_light(drive, true);
                }
                self.drive = drive;
            }
            _ => {}
        }
    }
}

impl Card for DiskII {
    fn name(&self) -> &'static str {
        "Disk II"
    }

    fn io_read(&mut self, offset: u8) -> u8 {
        self.switch(offset);
        crate::card::FLOATING_BUS
    }

    fn io_write(&mut self, offset: u8, _value: u8) {
        self.switch(offset);
    }
}

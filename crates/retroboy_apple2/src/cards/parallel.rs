use std::cell::RefCell;
use std::rc::Rc;

use crate::card::Card;

/// Paper output of the attached printer.
#[derive(Debug, Default)]
pub struct Printer {
    output: Vec<u8>,
}

pub type SharedPrinter = Rc<RefCell<Printer>>;

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn putc(&mut self, value: u8) {
        self.output.push(value);
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Printed text so far, with non-ASCII bytes replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}

/// Apple Parallel Interface card driving a [`Printer`].
pub struct Parallel {
    printer: SharedPrinter,
}

impl Parallel {
    pub fn new(printer: SharedPrinter) -> Self {
        Self { printer }
    }
}

impl Card for Parallel {
    fn name(&self) -> &'static str {
        "Parallel"
    }

    /// Bit 7 low: printer ready.
    fn io_read(&mut self, _offset: u8) -> u8 {
        0x00
    }

    fn io_write(&mut self, offset: u8, value: u8) {
        if offset == 0 {
            self.printer.borrow_mut().putc(value & 0x7F);
        }
    }
}

//! Progress reporting for block-by-block card operations
//!
//! The engines emit one event per block or page plus a final tally; what
//! happens with them is the observer's business. Closures implement
//! [`ProgressObserver`] directly, and [`DotWriter`] reproduces the classic
//! dump-tool output of one `.` or `x` per block.

use std::io::{self, Write};

/// One progress signal from a running read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A block or page was processed successfully.
    BlockOk,
    /// A block or page failed.
    BlockFailed,
    /// Final tally of the operation.
    Summary {
        /// Blocks or pages processed successfully.
        done: u32,
        /// Blocks or pages the operation covered.
        total: u32,
    },
}

/// Observer receiving per-block progress from the engines.
pub trait ProgressObserver {
    /// Handle one progress event.
    fn report(&mut self, event: ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Observer rendering progress the way the classic dump tools do: a `.`
/// per good block, an `x` per failed one, and a closing
/// `Done, X of Y <unit>.` line.
///
/// `unit` names what is being counted, e.g. `"blocks read"` or
/// `"pages read"`. Write errors on the sink are ignored; progress output
/// is best effort.
pub struct DotWriter<W: Write> {
    out: W,
    unit: &'static str,
}

impl<W: Write> DotWriter<W> {
    /// Dot renderer writing to `out`.
    pub const fn new(out: W, unit: &'static str) -> Self {
        Self { out, unit }
    }

    /// Consume the renderer and hand the sink back.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressObserver for DotWriter<W> {
    fn report(&mut self, event: ProgressEvent) {
        let _ = match event {
            ProgressEvent::BlockOk => write!(self.out, "."),
            ProgressEvent::BlockFailed => write!(self.out, "x"),
            ProgressEvent::Summary { done, total } => {
                writeln!(self.out, "|\nDone, {} of {} {}.", done, total, self.unit)
            }
        };
        let _ = self.out.flush();
    }
}

impl<W: Write> std::fmt::Debug for DotWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotWriter")
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

/// Dot renderer on standard output.
pub fn stdout_dots(unit: &'static str) -> DotWriter<io::Stdout> {
    DotWriter::new(io::stdout(), unit)
}

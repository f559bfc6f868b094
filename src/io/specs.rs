use crate::solvers::SolveOutcome;
use crate::utils::LabelType;
use crate::waba::{Extension, WabaFramework};
use anyhow::Result;
use std::io::{Read, Write};

/// The type of callback functions to call when warnings are raised while reading a framework.
///
/// The arguments are the (1-based) index of the line and the warning message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read weighted ABA frameworks.
pub trait InstanceReader<T>
where
    T: LabelType,
{
    /// Reads a [`WabaFramework`].
    ///
    /// In case warnings are raised, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    fn read(&self, reader: &mut dyn Read) -> Result<WabaFramework<T>>;

    /// Adds a callback function to call when warnings are raised while reading a framework.
    fn add_warning_handler(&mut self, h: WarningHandler);
}

/// A trait implemented by objects that write the extensions computed by the solvers.
pub trait ExtensionWriter<T>
where
    T: LabelType,
{
    /// Writes the text associated with the fact no extension satisfies the semantics.
    fn write_unsatisfiable(&self, writer: &mut dyn Write) -> Result<()>;

    /// Writes a list of extensions.
    fn write_extensions(&self, writer: &mut dyn Write, extensions: &[Extension<T>]) -> Result<()>;

    /// Writes the outcome of a search.
    fn write_outcome(&self, writer: &mut dyn Write, outcome: &SolveOutcome<T>) -> Result<()> {
        match outcome {
            SolveOutcome::Extensions(extensions) => self.write_extensions(writer, extensions),
            SolveOutcome::Unsatisfiable => self.write_unsatisfiable(writer),
        }
    }
}

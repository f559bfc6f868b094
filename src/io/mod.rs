//! Objects used to read weighted ABA frameworks and to write the extensions computed by the solvers.

mod specs;
pub use specs::ExtensionWriter;
pub use specs::InstanceReader;
pub use specs::WarningHandler;

mod text_extension_writer;
pub use text_extension_writer::TextExtensionWriter;

mod waba_reader;
pub use waba_reader::WabaReader;

mod warning_result;

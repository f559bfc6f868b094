use super::ExtensionWriter;
use crate::utils::LabelType;
use crate::waba::{Extension, WeightedAttack};
use anyhow::{Context, Result};
use std::fmt::Display;
use std::io::Write;

/// A writer for extensions, using a line-based text format.
///
/// When no extension satisfies the semantics, a single line `UNSATISFIABLE` is written.
/// Otherwise, each extension is written on five lines:
///
/// ```text
/// EXTENSION 1 cost 80
/// in a b
/// supported a:#sup b:80 c_a:80
/// successful
/// discarded c_a->a:80
/// ```
///
/// Extensions are numbered from 1, and the items of each line are separated by spaces.
///
/// # Example
///
/// ```
/// # use wabasolver::io::{ExtensionWriter, TextExtensionWriter};
/// # use wabasolver::solvers::SolveOutcome;
/// let mut buffer = Vec::new();
/// let writer = TextExtensionWriter::default();
/// writer.write_outcome(&mut buffer, &SolveOutcome::<String>::Unsatisfiable).unwrap();
/// assert_eq!("UNSATISFIABLE\n", String::from_utf8(buffer).unwrap());
/// ```
#[derive(Default)]
pub struct TextExtensionWriter {}

fn write_items<I, D>(writer: &mut dyn Write, key: &str, items: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = D>,
    D: Display,
{
    write!(writer, "{}", key)?;
    for item in items {
        write!(writer, " {}", item)?;
    }
    writeln!(writer)
}

fn write_attacks<T>(
    writer: &mut dyn Write,
    key: &str,
    attacks: &[WeightedAttack<T>],
) -> std::io::Result<()>
where
    T: LabelType,
{
    write_items(writer, key, attacks.iter())
}

impl<T> ExtensionWriter<T> for TextExtensionWriter
where
    T: LabelType,
{
    fn write_unsatisfiable(&self, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing an unsatisfiable outcome";
        writeln!(writer, "UNSATISFIABLE").context(context)?;
        writer.flush().context(context)
    }

    fn write_extensions(&self, writer: &mut dyn Write, extensions: &[Extension<T>]) -> Result<()> {
        for (i, extension) in extensions.iter().enumerate() {
            let context = || format!("while writing extension {}", i + 1);
            writeln!(writer, "EXTENSION {} cost {}", i + 1, extension.cost()).with_context(context)?;
            write_items(writer, "in", extension.assumptions().iter()).with_context(context)?;
            write_items(
                writer,
                "supported",
                extension
                    .supported()
                    .iter()
                    .map(|(a, w)| format!("{}:{}", a, w)),
            )
            .with_context(context)?;
            write_attacks(writer, "successful", extension.successful_attacks())
                .with_context(context)?;
            write_attacks(writer, "discarded", extension.discarded_attacks())
                .with_context(context)?;
        }
        writer.flush().context("while writing extensions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{MonoidKind, SemiringKind, Weight};
    use crate::io::{InstanceReader, WabaReader};
    use crate::solvers::{Semantics, SolveOutcome, WabaSolver};

    #[test]
    fn test_write_extensions() {
        let instance = "assumption(a).\nassumption(b).\ncontrary(a,c_a).\nhead(r1,c_a).\nbody(r1,b).\nweight(b,80).\n";
        let framework = WabaReader::default()
            .read(&mut instance.as_bytes())
            .unwrap();
        let outcome = WabaSolver::new(
            &framework,
            SemiringKind::Godel,
            MonoidKind::Max,
            Semantics::ST,
        )
        .with_budget(Weight::Finite(80.))
        .solve()
        .unwrap();
        let mut buffer = Vec::new();
        TextExtensionWriter::default()
            .write_outcome(&mut buffer, &outcome)
            .unwrap();
        assert_eq!(
            "EXTENSION 1 cost 0\nin b\nsupported b:80 c_a:80\nsuccessful c_a->a:80\ndiscarded\nEXTENSION 2 cost 80\nin a b\nsupported a:#sup b:80 c_a:80\nsuccessful\ndiscarded c_a->a:80\n",
            String::from_utf8(buffer).unwrap()
        );
    }

    #[test]
    fn test_write_no_extension() {
        let mut buffer = Vec::new();
        TextExtensionWriter::default()
            .write_outcome(&mut buffer, &SolveOutcome::<String>::Extensions(vec![]))
            .unwrap();
        assert!(buffer.is_empty());
    }
}

use super::{cli_manager, command::Command};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use strum::IntoEnumIterator;
use wabasolver::{
    algebra::{MonoidKind, SemiringKind},
    solvers::{Optimization, Semantics},
};

const CMD_NAME: &str = "algebras";

pub(crate) struct AlgebrasCommand;

impl AlgebrasCommand {
    pub(crate) fn new() -> Self {
        AlgebrasCommand
    }
}

impl<'a> Command<'a> for AlgebrasCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Displays the available semirings, monoids and semantics")
            .setting(AppSettings::DisableVersion)
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, _arg_matches: &ArgMatches<'_>) -> Result<()> {
        for s in SemiringKind::iter() {
            let semiring = s.semiring();
            println!(
                "semiring {} (default weight {})",
                s.as_ref(),
                semiring.default_weight()
            );
        }
        for m in MonoidKind::iter() {
            let monoid = m.monoid();
            println!(
                "monoid {} (identity {}, {} bound)",
                m.as_ref(),
                monoid.identity(),
                monoid.default_direction().as_ref()
            );
        }
        for s in Semantics::iter() {
            println!("semantics {}", s.as_ref());
        }
        for o in Optimization::iter() {
            println!("optimization {}", o.as_ref());
        }
        Ok(())
    }
}

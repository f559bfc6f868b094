use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use predicates::prelude::{predicate, PredicateBooleanExt};

const SCENARIO_TWO: &str = r#"% a is attacked by b, with weight 80
assumption(a).
assumption(b).
contrary(a,c_a).
head(r1,c_a).
body(r1,b).
weight(b,80).
"#;

const ODD_CYCLE: &str = r#"assumption(a).
assumption(b).
assumption(c).
contrary(a,c_a).
contrary(b,c_b).
contrary(c,c_c).
head(r1,c_b).
body(r1,a).
head(r2,c_c).
body(r2,b).
head(r3,c_a).
body(r3,c).
"#;

fn solve_command(instance: &str, args: &[&str]) -> Result<(NamedTempFile, Command), Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("test_instance.waba")?;
    file.write_str(instance)?;
    let mut cmd = Command::cargo_bin("wabasolver")?;
    cmd.arg("solve")
        .arg("-f")
        .arg(file.path())
        .arg("--logging-level")
        .arg("off")
        .args(args);
    Ok((file, cmd))
}

fn test_output(instance: &str, args: &[&str], expected: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (file, mut cmd) = solve_command(instance, args)?;
    cmd.assert().success().stdout(predicate::eq(expected));
    file.close()?;
    Ok(())
}

#[test]
fn test_default_parameters() -> Result<(), Box<dyn std::error::Error>> {
    test_output(
        SCENARIO_TWO,
        &[],
        "EXTENSION 1 cost 0\nin b\nsupported b:80 c_a:80\nsuccessful c_a->a:80\ndiscarded\n",
    )
}

#[test]
fn test_budget() -> Result<(), Box<dyn std::error::Error>> {
    test_output(
        SCENARIO_TWO,
        &["-b", "80"],
        "EXTENSION 1 cost 0\nin b\nsupported b:80 c_a:80\nsuccessful c_a->a:80\ndiscarded\nEXTENSION 2 cost 80\nin a b\nsupported a:#sup b:80 c_a:80\nsuccessful\ndiscarded c_a->a:80\n",
    )
}

#[test]
fn test_budget_below_attack_weight() -> Result<(), Box<dyn std::error::Error>> {
    test_output(
        SCENARIO_TWO,
        &["--budget", "79.5"],
        "EXTENSION 1 cost 0\nin b\nsupported b:80 c_a:80\nsuccessful c_a->a:80\ndiscarded\n",
    )
}

#[test]
fn test_optimize_max() -> Result<(), Box<dyn std::error::Error>> {
    test_output(
        SCENARIO_TWO,
        &["--monoid", "sum", "-b", "100", "--optimize", "max"],
        "EXTENSION 1 cost 80\nin a b\nsupported a:#sup b:80 c_a:80\nsuccessful\ndiscarded c_a->a:80\n",
    )
}

#[test]
fn test_max_results() -> Result<(), Box<dyn std::error::Error>> {
    let (file, mut cmd) = solve_command(SCENARIO_TWO, &["-s", "cf", "-b", "#sup", "-n", "1"])?;
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("EXTENSION 1 ").and(predicate::str::contains("EXTENSION 2").not()));
    file.close()?;
    Ok(())
}

#[test]
fn test_unsatisfiable() -> Result<(), Box<dyn std::error::Error>> {
    test_output(ODD_CYCLE, &["-s", "st"], "UNSATISFIABLE\n")
}

#[test]
fn test_grounded_of_odd_cycle() -> Result<(), Box<dyn std::error::Error>> {
    test_output(
        ODD_CYCLE,
        &["-s", "gr", "--threads", "2"],
        "EXTENSION 1 cost 0\nin\nsupported\nsuccessful\ndiscarded\n",
    )
}

#[test]
fn test_node_limit() -> Result<(), Box<dyn std::error::Error>> {
    let (file, mut cmd) = solve_command(ODD_CYCLE, &["-s", "adm", "--node-limit", "0"])?;
    cmd.assert().success();
    file.close()?;
    Ok(())
}

#[test]
fn test_unknown_algebra() -> Result<(), Box<dyn std::error::Error>> {
    for args in [
        ["--semiring", "product"],
        ["--monoid", "avg"],
        ["-s", "naive"],
    ] {
        let (file, mut cmd) = solve_command(SCENARIO_TWO, &args)?;
        cmd.assert().failure();
        file.close()?;
    }
    Ok(())
}

#[test]
fn test_invalid_numbers() -> Result<(), Box<dyn std::error::Error>> {
    for args in [
        ["-b", "eighty"],
        ["-n", "-1"],
        ["--threads", "two"],
        ["--timeout", "-3"],
    ] {
        let (file, mut cmd) = solve_command(SCENARIO_TWO, &args)?;
        cmd.assert().failure();
        file.close()?;
    }
    Ok(())
}

#[test]
fn test_syntax_error() -> Result<(), Box<dyn std::error::Error>> {
    let (file, mut cmd) = solve_command("assumption(a)\n", &[])?;
    cmd.assert().failure();
    file.close()?;
    Ok(())
}

#[test]
fn test_missing_file() {
    let mut cmd = Command::cargo_bin("wabasolver").unwrap();
    cmd.arg("solve")
        .arg("-f")
        .arg("/this/file/does/not/exist.waba")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().failure();
}

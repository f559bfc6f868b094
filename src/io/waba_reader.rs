use super::{warning_result::WarningResult, InstanceReader, WarningHandler};
use crate::algebra::Weight;
use crate::waba::{Language, WabaFramework};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Read};

const LABEL_AND_SPACE_PATTERN: &str = r"\s*[_[:alpha:]\d]+\s*";

lazy_static! {
    static ref FACT_LINE_PATTERN: Regex =
        Regex::new(r"^\s*([a-z]+)\(([^()]*)\)\.\s*(%.*)?$").unwrap();
    static ref LABEL_PATTERN: Regex =
        Regex::new(&format!(r"^{}$", LABEL_AND_SPACE_PATTERN)).unwrap();
}

const DEFAULT_LABELS_CAP: usize = 1 << 10;

#[derive(Debug, Clone, PartialEq)]
enum Fact {
    Assumption(String),
    Head(String, String),
    Body(String, String),
    Contrary(String, String),
    Weight(String, Weight),
}

fn read_label(s: &str) -> Result<WarningResult<String>> {
    if !LABEL_PATTERN.is_match(s) {
        return Err(anyhow!(r#"invalid atom name "{}""#, s.trim()));
    }
    let trimmed = s.trim().to_string();
    if trimmed.len() == s.len() {
        Ok(WarningResult::Ok(trimmed))
    } else {
        Ok(WarningResult::Warned(
            trimmed,
            vec!["atom names beginning or ending by spaces may be ambiguous".to_string()],
        ))
    }
}

fn try_read_fact_line(l: &str) -> Result<Option<WarningResult<Fact>>> {
    let captures = match FACT_LINE_PATTERN.captures(l) {
        Some(c) => c,
        None => return Ok(None),
    };
    let predicate = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let args = captures
        .get(2)
        .map(|m| m.as_str().split(',').collect::<Vec<&str>>())
        .unwrap_or_default();
    let expect_n_args = |expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(anyhow!(
                r#"wrong number of arguments for a "{}" fact; expected {}, got {}"#,
                predicate,
                expected,
                args.len()
            ))
        }
    };
    let fact = match predicate {
        "assumption" => {
            expect_n_args(1)?;
            read_label(args[0])?.map(Fact::Assumption)
        }
        "head" => {
            expect_n_args(2)?;
            read_label(args[0])?
                .zip(read_label(args[1])?)
                .map(|(r, h)| Fact::Head(r, h))
        }
        "body" => {
            expect_n_args(2)?;
            read_label(args[0])?
                .zip(read_label(args[1])?)
                .map(|(r, b)| Fact::Body(r, b))
        }
        "contrary" => {
            expect_n_args(2)?;
            read_label(args[0])?
                .zip(read_label(args[1])?)
                .map(|(a, c)| Fact::Contrary(a, c))
        }
        "weight" => {
            expect_n_args(2)?;
            let weight = args[1]
                .trim()
                .parse::<Weight>()
                .with_context(|| format!(r#"invalid weight "{}""#, args[1].trim()))?;
            read_label(args[0])?.map(|a| Fact::Weight(a, weight))
        }
        _ => return Err(anyhow!(r#"unknown predicate "{}""#, predicate)),
    };
    Ok(Some(fact))
}

#[derive(Default)]
struct RuleDecl {
    head: Option<(usize, String)>,
    body: Vec<String>,
    first_line: usize,
}

/// A reader for weighted ABA frameworks written as a list of facts.
///
/// This object is used to read a [`WabaFramework`] from a text in which each line is either empty,
/// a comment beginning by `%`, or a fact among the following ones:
///
/// * `assumption(A).` declares the assumption `A`;
/// * `head(R,X).` sets the head of the rule `R` to the atom `X`;
/// * `body(R,X).` adds the atom `X` to the body of the rule `R`;
/// * `contrary(A,X).` sets the contrary of the assumption `A` to the atom `X`;
/// * `weight(X,W).` sets the weight of the atom `X`, where `W` is a number, `#sup` or `#inf`.
///
/// Each rule must have exactly one head; a rule with no body is a fact.
/// Rule names only identify rules and are not atoms.
/// The [`LabelType`](crate::utils::LabelType) of the returned frameworks is [`String`].
///
/// # Format
///
/// The following content defines a framework with two assumptions `a` and `b`,
/// where `b` (weighted 80) supports the contrary `c_a` of `a`.
///
/// ```text
/// % a simple framework
/// assumption(a).
/// assumption(b).
/// contrary(a,c_a).
/// head(r1,c_a).
/// body(r1,b).
/// weight(b,80).
/// ```
///
/// # Example
///
/// ```
/// # use wabasolver::io::{InstanceReader, WabaReader};
/// # use wabasolver::waba::WabaFramework;
/// fn read_framework_from_str(s: &str) -> WabaFramework<String> {
///     let reader = WabaReader::default();
///     reader.read(&mut s.as_bytes()).expect("invalid framework")
/// }
/// # read_framework_from_str("assumption(a).");
/// ```
#[derive(Default)]
pub struct WabaReader {
    warning_handlers: Vec<WarningHandler>,
}

impl WabaReader {
    fn warn(&self, line_index: usize, warning: &str) {
        self.warning_handlers
            .iter()
            .for_each(|h| (h)(1 + line_index, warning.to_string()));
    }

    fn build_framework(&self, facts: Vec<(usize, Fact)>) -> Result<WabaFramework<String>> {
        let mut labels = Vec::with_capacity(DEFAULT_LABELS_CAP);
        let mut known_labels = HashSet::new();
        let mut add_label = |l: &String| {
            if known_labels.insert(l.clone()) {
                labels.push(l.clone());
            }
        };
        let mut rules: Vec<(String, RuleDecl)> = Vec::new();
        let mut rule_indices = HashMap::new();
        let mut rule_index = |rules: &mut Vec<(String, RuleDecl)>, r: &String, i: usize| {
            *rule_indices.entry(r.clone()).or_insert_with(|| {
                rules.push((
                    r.clone(),
                    RuleDecl {
                        first_line: i,
                        ..Default::default()
                    },
                ));
                rules.len() - 1
            })
        };
        for (i, fact) in facts.iter() {
            match fact {
                Fact::Assumption(a) => add_label(a),
                Fact::Head(r, h) => {
                    add_label(h);
                    let index = rule_index(&mut rules, r, *i);
                    let decl = &mut rules[index].1;
                    if decl.head.is_some() {
                        return Err(anyhow!("rule {} has more than one head", r))
                            .with_context(|| format!("while reading line with index {}", i));
                    }
                    decl.head = Some((*i, h.clone()));
                }
                Fact::Body(r, b) => {
                    add_label(b);
                    let index = rule_index(&mut rules, r, *i);
                    rules[index].1.body.push(b.clone());
                }
                Fact::Contrary(a, c) => {
                    add_label(a);
                    add_label(c);
                }
                Fact::Weight(a, _) => add_label(a),
            }
        }
        let mut framework = WabaFramework::new_with_language(Language::new_with_labels(&labels));
        for (i, fact) in facts.iter() {
            if let Fact::Assumption(a) = fact {
                if framework.is_assumption(a)? {
                    self.warn(*i, &format!("assumption {} is declared more than once", a));
                    continue;
                }
                framework
                    .new_assumption(a)
                    .with_context(|| format!("while reading line with index {}", i))?;
            }
        }
        for (r, decl) in rules.iter() {
            let (i, head) = match &decl.head {
                Some(h) => h,
                None => {
                    return Err(anyhow!("rule {} has no head", r))
                        .with_context(|| format!("while reading line with index {}", decl.first_line))
                }
            };
            let body = decl.body.iter().collect::<Vec<&String>>();
            framework
                .new_rule(head, &body)
                .with_context(|| format!("while reading line with index {}", i))?;
        }
        for (i, fact) in facts.iter() {
            let context = || format!("while reading line with index {}", i);
            match fact {
                Fact::Contrary(a, c) => framework.set_contrary(a, c).with_context(context)?,
                Fact::Weight(a, w) => framework.set_weight(a, *w).with_context(context)?,
                _ => {}
            }
        }
        Ok(framework)
    }
}

impl InstanceReader<String> for WabaReader {
    fn read(&self, reader: &mut dyn Read) -> Result<WabaFramework<String>> {
        let br = BufReader::new(reader);
        let mut facts = Vec::new();
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let l = line.with_context(context)?;
            let trimmed = l.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            match try_read_fact_line(&l).with_context(context)? {
                Some(fact) => {
                    let warning_consumer = |warnings: Vec<String>| {
                        warnings.iter().for_each(|w| self.warn(i, w));
                    };
                    facts.push((i, fact.consume_warnings(warning_consumer)));
                }
                None => {
                    return Err(anyhow!(r#"syntax error in line "{}""#, l)).with_context(context)
                }
            }
        }
        self.build_framework(facts)
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    fn read(instance: &str) -> Result<WabaFramework<String>> {
        WabaReader::default().read(&mut instance.as_bytes())
    }

    fn read_with_warnings(instance: &str) -> (WabaFramework<String>, Vec<(usize, String)>) {
        let warnings = Rc::new(RefCell::new(vec![]));
        let warnings_clone = Rc::clone(&warnings);
        let mut reader = WabaReader::default();
        reader.add_warning_handler(Box::new(move |i, w| {
            warnings_clone.borrow_mut().push((i, w))
        }));
        let framework = reader.read(&mut instance.as_bytes()).unwrap();
        let w = warnings.borrow().clone();
        (framework, w)
    }

    #[test]
    fn test_fact_line_pattern() {
        assert!(FACT_LINE_PATTERN.is_match("assumption(a)."));
        assert!(FACT_LINE_PATTERN.is_match("  head(r1,c_a).  "));
        assert!(FACT_LINE_PATTERN.is_match("weight(a,#sup). % comment"));
        assert!(!FACT_LINE_PATTERN.is_match("assumption(a)"));
        assert!(!FACT_LINE_PATTERN.is_match("assumption a."));
        assert!(!FACT_LINE_PATTERN.is_match("assumption(a).assumption(b)."));
    }

    #[test]
    fn test_try_read_fact_line() {
        let read_fact = |l| {
            try_read_fact_line(l)
                .unwrap()
                .unwrap()
                .consume_warnings(|_| {})
        };
        assert_eq!(Fact::Assumption("a".to_string()), read_fact("assumption(a)."));
        assert_eq!(
            Fact::Head("r1".to_string(), "c_a".to_string()),
            read_fact("head(r1, c_a).")
        );
        assert_eq!(
            Fact::Weight("b".to_string(), Weight::Finite(-2.5)),
            read_fact("weight(b,-2.5).")
        );
        assert_eq!(
            Fact::Weight("b".to_string(), Weight::NegInf),
            read_fact("weight(b, #inf).")
        );
        assert!(try_read_fact_line("garbage").unwrap().is_none());
    }

    #[test]
    fn test_try_read_fact_line_errors() {
        for l in [
            "assumption(a,b).",
            "assumption(a.b).",
            "rule(r1,a).",
            "weight(a,heavy).",
            "weight(a,NaN).",
            "contrary(a).",
        ] {
            assert!(try_read_fact_line(l).is_err(), "{}", l);
        }
    }

    #[test]
    fn test_read_ok() {
        let instance = "% a framework\nassumption(a).\nassumption(b).\n\nbody(r1,b).\nhead(r1,c_a).\ncontrary(a,c_a).\nweight(b,80).\n";
        let framework = read(instance).unwrap();
        assert_eq!(3, framework.language().len());
        assert_eq!(2, framework.n_assumptions());
        assert_eq!(1, framework.n_rules());
        assert_eq!(
            "c_a",
            framework
                .get_contrary(&"a".to_string())
                .unwrap()
                .unwrap()
                .label()
                .as_str()
        );
        assert_eq!(
            Some(Weight::Finite(80.)),
            framework.get_weight(&"b".to_string()).unwrap()
        );
        let rule = framework.iter_rules().next().unwrap();
        assert_eq!("c_a", rule.head().label().as_str());
        assert_eq!(
            vec!["b"],
            rule.iter_body().map(|a| a.label().as_str()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_read_empty() {
        let framework = read("\n% nothing\n").unwrap();
        assert!(framework.language().is_empty());
    }

    #[test]
    fn test_read_fact_rule() {
        let framework = read("assumption(a).\ncontrary(a,c_a).\nhead(r,c_a).\n").unwrap();
        assert!(framework.iter_rules().next().unwrap().is_fact());
    }

    #[test]
    fn test_read_rule_without_head() {
        let err = read("assumption(a).\nbody(r,a).\n").unwrap_err();
        assert_eq!("while reading line with index 1", err.to_string());
        assert_eq!("rule r has no head", err.root_cause().to_string());
    }

    #[test]
    fn test_read_rule_with_two_heads() {
        assert!(read("head(r,a).\nhead(r,b).\n").is_err());
    }

    #[test]
    fn test_read_assumption_as_head() {
        assert!(read("assumption(a).\nhead(r,a).\n").is_err());
    }

    #[test]
    fn test_read_two_contraries() {
        let err = read("assumption(a).\ncontrary(a,b).\ncontrary(a,c).\n").unwrap_err();
        assert_eq!("while reading line with index 2", err.to_string());
    }

    #[test]
    fn test_read_syntax_error() {
        assert!(read("assumption(a).\nthis is not a fact\n").is_err());
    }

    #[test]
    fn test_read_warnings() {
        let (framework, warnings) =
            read_with_warnings("assumption( a).\nassumption(b).\nassumption(b).\n");
        assert_eq!(2, framework.n_assumptions());
        assert_eq!(
            vec![
                (
                    1,
                    "atom names beginning or ending by spaces may be ambiguous".to_string()
                ),
                (3, "assumption b is declared more than once".to_string())
            ],
            warnings
        );
    }
}

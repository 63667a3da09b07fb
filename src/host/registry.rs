use std::collections::BTreeMap;

use crate::foundation::error::{DeintError, DeintResult};
use crate::host::core::Core;
use crate::host::node::Clip;

/// One filter argument value.
#[derive(Clone, Debug)]
pub enum ArgValue {
    /// Video node handle.
    Clip(Clip),
    /// Integer.
    Int(i64),
}

impl ArgValue {
    fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Clip(_) => ArgKind::Clip,
            ArgValue::Int(_) => ArgKind::Int,
        }
    }
}

/// Named arguments passed to a filter constructor.
#[derive(Clone, Debug, Default)]
pub struct Args {
    values: BTreeMap<String, ArgValue>,
}

impl Args {
    /// Empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a clip argument.
    pub fn set_clip(&mut self, name: impl Into<String>, clip: Clip) -> &mut Self {
        self.values.insert(name.into(), ArgValue::Clip(clip));
        self
    }

    /// Set an integer argument.
    pub fn set_int(&mut self, name: impl Into<String>, v: i64) -> &mut Self {
        self.values.insert(name.into(), ArgValue::Int(v));
        self
    }

    /// Clip argument `name`, if present.
    pub fn get_clip(&self, name: &str) -> DeintResult<Option<&Clip>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ArgValue::Clip(c)) => Ok(Some(c)),
            Some(other) => Err(type_mismatch(name, ArgKind::Clip, other.kind())),
        }
    }

    /// Integer argument `name`, if present.
    pub fn get_int(&self, name: &str) -> DeintResult<Option<i64>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(ArgValue::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(type_mismatch(name, ArgKind::Int, other.kind())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArgKind {
    Clip,
    Int,
}

fn type_mismatch(name: &str, want: ArgKind, got: ArgKind) -> DeintError {
    DeintError::config(format!("argument '{name}' must be {want:?}, got {got:?}"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ParamSpec {
    name: String,
    kind: ArgKind,
    optional: bool,
}

/// Parse a `name:type[:opt];...` signature. Types are `vnode` and `int`.
fn parse_signature(sig: &str) -> DeintResult<Vec<ParamSpec>> {
    let mut out = Vec::new();
    for part in sig.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let mut fields = part.split(':');
        let name = fields.next().unwrap_or_default();
        let kind = match fields.next() {
            Some("vnode") => ArgKind::Clip,
            Some("int") => ArgKind::Int,
            other => {
                return Err(DeintError::config(format!(
                    "unsupported type {other:?} for parameter '{name}'"
                )));
            }
        };
        let optional = match fields.next() {
            None => false,
            Some("opt") => true,
            Some(flag) => {
                return Err(DeintError::config(format!(
                    "unknown flag '{flag}' for parameter '{name}'"
                )));
            }
        };
        if name.is_empty() {
            return Err(DeintError::config(format!("unnamed parameter in '{sig}'")));
        }
        out.push(ParamSpec {
            name: name.to_string(),
            kind,
            optional,
        });
    }
    Ok(out)
}

/// Filter constructor.
pub type CreateFn = fn(&Args, &Core) -> DeintResult<Clip>;

struct Registered {
    params: Vec<ParamSpec>,
    create: CreateFn,
}

/// Named, parameterised filter constructors.
#[derive(Default)]
pub struct Registry {
    filters: BTreeMap<String, Registered>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with parameter signature `sig`, e.g. `clip:vnode;mode:int:opt`.
    pub fn register(&mut self, name: &str, sig: &str, create: CreateFn) -> DeintResult<()> {
        if self.filters.contains_key(name) {
            return Err(DeintError::config(format!(
                "filter '{name}' is already registered"
            )));
        }
        let params = parse_signature(sig)?;
        self.filters
            .insert(name.to_string(), Registered { params, create });
        Ok(())
    }

    /// Names of registered filters, sorted.
    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    /// Check `args` against the signature of `name` and run its constructor.
    pub fn invoke(&self, name: &str, args: &Args, core: &Core) -> DeintResult<Clip> {
        let filter = self
            .filters
            .get(name)
            .ok_or_else(|| DeintError::config(format!("no filter named '{name}'")))?;

        for p in &filter.params {
            match args.values.get(&p.name) {
                None if !p.optional => {
                    return Err(DeintError::config(format!(
                        "{name}: argument '{}' is required",
                        p.name
                    )));
                }
                None => {}
                Some(v) if v.kind() != p.kind => {
                    return Err(type_mismatch(&p.name, p.kind, v.kind()));
                }
                Some(_) => {}
            }
        }
        if let Some(extra) = args
            .values
            .keys()
            .find(|k| !filter.params.iter().any(|p| &p.name == *k))
        {
            return Err(DeintError::config(format!(
                "{name}: unknown argument '{extra}'"
            )));
        }

        (filter.create)(args, core)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/registry.rs"]
mod tests;

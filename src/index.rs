//! Symbol index — the cross-reference registry and type rendering.
//!
//! Built once per run by walking the documentation tree, read-only afterwards.
//! Emission-time type resolution may reach any compound transitively, so the
//! whole tree must be registered before the first compound is rendered.

use crate::diag::Diagnostics;
use crate::model::TypeExpr;
use std::collections::HashMap;

/// Identity record for a documentable entity: stable id plus qualified name.
#[derive(Debug, Clone)]
pub struct Reference {
    pub id: String,
    pub name: String,
}

/// Context for resolving a container's reference to itself inside its own
/// members' types. Threaded explicitly through type rendering, never ambient.
pub struct SelfRef<'a> {
    pub id: &'a str,
    pub name: &'a str,
    /// Template-argument text to append when the documentation wrote the bare
    /// container name, e.g. `<T>` so that `Foo` prints as `Foo<T>`.
    pub template_args: String,
}

#[derive(Default)]
pub struct SymbolIndex {
    references: HashMap<String, Reference>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        SymbolIndex::default()
    }

    /// Insert `reference` under its id. An id collision with a different name
    /// is a build-time inconsistency; with the same name it is a redundant
    /// registration. Both are reported, neither aborts. With `overwrite`
    /// false the existing entry is kept.
    pub fn register(&mut self, reference: Reference, overwrite: bool, diag: &mut Diagnostics) {
        if let Some(existing) = self.references.get(&reference.id) {
            if existing.name != reference.name {
                diag.warn(&format!(
                    "compound collision: {} already registered as `{}`, now `{}`",
                    reference.id, existing.name, reference.name
                ));
            } else {
                diag.warn(&format!(
                    "duplicate reference: {} (`{}`)",
                    reference.id, reference.name
                ));
            }
            if !overwrite {
                return;
            }
        }
        self.references.insert(reference.id.clone(), reference);
    }

    /// Qualified name for a registered id, `None` when unknown. Absence is an
    /// expected condition handled by the caller, never a panic.
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.references.get(id).map(|r| r.name.as_str())
    }

    /// Collapse a type expression into a printable type string.
    ///
    /// Cross-reference markers resolve to qualified names; a marker naming the
    /// container itself substitutes the container's own name and, unless the
    /// following text already opens a `<...>` list, its template arguments.
    /// Unknown ids fall back to the marker's literal text with one diagnostic.
    pub fn render_type(
        &self,
        expr: &TypeExpr,
        self_ref: Option<&SelfRef>,
        diag: &mut Diagnostics,
    ) -> String {
        let mut tokens: Vec<String> = Vec::new();
        push_token(&mut tokens, &expr.text);
        for part in &expr.parts {
            if let Some(refid) = &part.refid {
                match self_ref {
                    Some(me) if me.id == refid.as_str() => {
                        if part.tail.trim_start().starts_with('<') {
                            tokens.push(me.name.to_string());
                        } else {
                            tokens.push(format!("{}{}", me.name, me.template_args));
                        }
                    }
                    _ => {
                        if let Some(name) = self.resolve(refid) {
                            tokens.push(name.to_string());
                        } else {
                            diag.warn(&format!(
                                "unknown reference: {} (`{}`)",
                                refid,
                                part.text.trim()
                            ));
                            push_token(&mut tokens, &part.text);
                        }
                    }
                }
            } else {
                push_token(&mut tokens, &part.text);
            }
            push_token(&mut tokens, &part.tail);
        }
        tokens.join(" ")
    }
}

/// Append a trimmed token, collapsing internal whitespace runs. Resolved
/// names are pushed directly and never pass through here.
fn push_token(tokens: &mut Vec<String>, raw: &str) {
    let mut words = raw.split_whitespace();
    if let Some(first) = words.next() {
        let mut token = first.to_string();
        for word in words {
            token.push(' ');
            token.push_str(word);
        }
        tokens.push(token);
    }
}

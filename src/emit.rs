//! C++ emission — text templates and the generation driver.
//!
//! The generated unit lives in a fixed `doxygen` namespace and consists of
//! template specializations consumed by the binding layer's docstring lookup.
//! Byte-exact formatting is not a contract; the declared specializations and
//! type strings are.

use crate::compound::{ClassDoc, NamespaceDoc};
use crate::diag::Diagnostics;
use crate::index::{Reference, SymbolIndex};
use crate::model::CompoundKind;
use crate::parser;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

pub fn file_header(header_dir: &str) -> String {
    format!(
        "#ifndef DOXYGEN_AUTODOC_HH\n\
         #define DOXYGEN_AUTODOC_HH\n\
         \n\
         #include \"{}/doxygen.hh\"\n\
         \n\
         namespace doxygen {{\n",
        header_dir
    )
}

pub const FILE_FOOTER: &str = "\n} // namespace doxygen\n#endif // DOXYGEN_AUTODOC_HH\n";

/// One constructor overload, keyed on the class (template arguments applied)
/// and the rendered argument list.
pub fn constructor_doc(
    tplargs: &str,
    nargs: usize,
    class_name: &str,
    argsstring: &str,
    docstring: &str,
) -> String {
    let comma = if nargs > 0 { ", " } else { "" };
    format!(
        "\ntemplate <{}>\n\
         struct constructor_doc_{}_impl< {}{}{} >\n\
         {{\n\
         static inline const char* run ()\n\
         {{\n  return \"{}\";\n}}\n\
         }};",
        tplargs,
        nargs,
        class_name,
        comma,
        argsstring,
        escape_cstring(docstring)
    )
}

/// The destructor specialization, keyed on the class alone.
pub fn destructor_doc(tplargs: &str, class_name: &str, docstring: &str) -> String {
    format!(
        "\ntemplate <{}>\n\
         struct destructor_doc_impl < {} >\n\
         {{\n\
         static inline const char* run ()\n\
         {{\n  return \"{}\";\n}}\n\
         }};",
        tplargs,
        class_name,
        escape_cstring(docstring)
    )
}

/// One emitted unit per prototype group: the signature is declared once, the
/// body is the first-match chain of clauses.
pub fn member_func_doc(
    tplargs: &str,
    return_type: &str,
    class_prefix: &str,
    argsstring: &str,
    body: &str,
) -> String {
    let template = if tplargs.is_empty() {
        String::new()
    } else {
        format!("template <{}>\n", tplargs)
    };
    format!(
        "\n{}inline const char* member_func_doc ({} ({}*function_ptr) {})\n\
         {{{}\n  return \"\";\n}}",
        template, return_type, class_prefix, argsstring, body
    )
}

/// One conditional clause: the overload is identified at runtime by comparing
/// the caller's function pointer against the named member.
pub fn member_func_clause(
    return_type: &str,
    class_prefix: &str,
    argsstring: &str,
    member_name: &str,
    docstring: &str,
) -> String {
    format!(
        "\n  if (function_ptr == static_cast<{} ({}*) {}>(&{}{}))\n    return \"{}\";",
        return_type,
        class_prefix,
        argsstring,
        class_prefix,
        member_name,
        escape_cstring(docstring)
    )
}

/// Escape a docstring for embedding in a C string literal.
pub fn escape_cstring(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Orchestrates index construction and emission. The index is fully built
/// over all top-level compounds before any compound is rendered; rendering
/// earlier can silently mis-resolve forward references.
pub struct Generator {
    index: SymbolIndex,
    /// Compounds to emit, in index-document order. Namespaces occupy the
    /// reference set but are never emitted.
    classes: Vec<ClassDoc>,
    #[allow(dead_code)]
    namespaces: Vec<NamespaceDoc>,
}

impl Generator {
    /// Walk the index document and materialize every class, struct, and
    /// namespace compound, registering all references.
    pub fn build(index_path: &Path, diag: &mut Diagnostics) -> Result<Self> {
        let entries = parser::parse_index(index_path)?;
        let directory = index_path.parent().unwrap_or_else(|| Path::new("."));

        let mut index = SymbolIndex::new();
        let mut classes = Vec::new();
        let mut namespaces = Vec::new();

        for entry in entries {
            let compound_path = directory.join(format!("{}.xml", entry.refid));
            match entry.kind {
                CompoundKind::Class | CompoundKind::Struct => {
                    let compound = parser::parse_compound(&compound_path)?;
                    let class = ClassDoc::from_compound(compound, &mut index, diag);
                    index.register(
                        Reference {
                            id: class.id.clone(),
                            name: class.name.clone(),
                        },
                        true,
                        diag,
                    );
                    classes.push(class);
                }
                CompoundKind::Namespace => {
                    let compound = parser::parse_compound(&compound_path)?;
                    let namespace = NamespaceDoc::from_compound(compound, &mut index, diag);
                    index.register(
                        Reference {
                            id: namespace.id.clone(),
                            name: namespace.name.clone(),
                        },
                        true,
                        diag,
                    );
                    namespaces.push(namespace);
                }
                _ => {}
            }
        }

        Ok(Generator {
            index,
            classes,
            namespaces,
        })
    }

    /// Emit the complete unit: header, one block per emittable compound,
    /// footer.
    pub fn write(
        &self,
        out: &mut dyn Write,
        header_dir: &str,
        diag: &mut Diagnostics,
    ) -> Result<()> {
        out.write_all(file_header(header_dir).as_bytes())?;
        for class in &self.classes {
            out.write_all(class.render(&self.index, diag).as_bytes())?;
        }
        out.write_all(FILE_FOOTER.as_bytes())?;
        Ok(())
    }
}

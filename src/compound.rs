//! Compound descriptors — classes, structs, and namespaces.
//!
//! A class compound owns its member descriptors and implements the emission
//! protocol; a namespace only contributes reference registrations so that
//! cross-references into its typedefs and enums resolve.

use crate::diag::Diagnostics;
use crate::emit;
use crate::index::{Reference, SelfRef, SymbolIndex};
use crate::member::{MemberDoc, PrototypeKey};
use crate::model::{Compound, CompoundKind, Member, MemberKind, Protection, TemplateParam};

/// A documented class or struct.
#[derive(Debug)]
pub struct ClassDoc {
    pub id: String,
    pub name: String,
    #[allow(dead_code)]
    pub is_struct: bool,
    pub is_public: bool,
    /// A name containing a template-argument list marks a specialization;
    /// argument substitution is not attempted for those.
    pub is_specialization: bool,
    pub template_params: Vec<TemplateParam>,
    pub member_funcs: Vec<MemberDoc>,
    /// Partitioned out so they never join the ordinary member path; emitting
    /// them is future work.
    #[allow(dead_code)]
    pub static_funcs: Vec<MemberDoc>,
    pub special_funcs: Vec<MemberDoc>,
}

impl ClassDoc {
    /// Scan a compound's public members once: typedefs, enums, and enum
    /// values register references; functions become member descriptors.
    pub fn from_compound(
        compound: Compound,
        index: &mut SymbolIndex,
        diag: &mut Diagnostics,
    ) -> Self {
        let mut doc = ClassDoc {
            is_struct: compound.kind == CompoundKind::Struct,
            is_public: compound.prot == Protection::Public,
            is_specialization: compound.name.contains('<'),
            id: compound.id,
            name: compound.name,
            template_params: compound.template_params,
            member_funcs: Vec::new(),
            static_funcs: Vec::new(),
            special_funcs: Vec::new(),
        };

        for member in compound.members {
            if member.prot != Protection::Public {
                continue;
            }
            match member.kind {
                MemberKind::Typedef => register_member(&doc.name, &member, index, diag),
                MemberKind::Enum => {
                    register_member(&doc.name, &member, index, diag);
                    register_enum_values(&doc.name, &member, index, diag);
                }
                MemberKind::Function => {
                    let m = MemberDoc::from_member(member);
                    if m.special {
                        doc.special_funcs.push(m);
                    } else if m.is_static {
                        doc.static_funcs.push(m);
                    } else {
                        doc.member_funcs.push(m);
                    }
                }
                // Plain data attributes are recognized but not emitted.
                MemberKind::Variable | MemberKind::Other => {}
            }
        }
        doc
    }

    /// Container name with template arguments applied, e.g. `Foo<T, U>`.
    fn class_name(&self) -> String {
        if self.template_params.is_empty() {
            self.name.clone()
        } else {
            format!("{}{}", self.name, template_args(&self.template_params))
        }
    }

    /// `kind name` pairs for a template declaration, e.g. `typename T, int N`.
    fn template_decl(&self) -> String {
        template_decl(&self.template_params)
    }

    /// Self-resolution context, present only when the container is templated.
    fn self_ref(&self) -> Option<SelfRef<'_>> {
        if self.template_params.is_empty() {
            None
        } else {
            Some(SelfRef {
                id: &self.id,
                name: &self.name,
                template_args: template_args(&self.template_params),
            })
        }
    }

    /// Emit the compound's specializations. Non-public compounds emit nothing;
    /// template specializations emit nothing and one diagnostic.
    pub fn render(&self, index: &SymbolIndex, diag: &mut Diagnostics) -> String {
        if !self.is_public {
            return String::new();
        }
        if self.is_specialization {
            diag.warn(&format!(
                "skipping {}: template arguments are not resolved for template specializations",
                self.name
            ));
            return String::new();
        }

        let self_ref = self.self_ref();
        let class_name = self.class_name();
        let prefix = format!("{}::", class_name);
        let mut out = String::new();

        // Constructors and destructors: emitted individually, never grouped
        // by prototype.
        for member in &self.special_funcs {
            let docstring = member.docstring();
            if docstring.is_empty() {
                continue;
            }
            if member.is_destructor() {
                out.push_str(&emit::destructor_doc(
                    &self.template_decl(),
                    &class_name,
                    &docstring,
                ));
            } else {
                let tplargs = combined_template_decl(&self.template_params, member);
                out.push_str(&emit::constructor_doc(
                    &tplargs,
                    member.params.len(),
                    &class_name,
                    &member.render_args(index, self_ref.as_ref(), diag),
                    &docstring,
                ));
            }
        }

        // Group ordinary member functions by structural prototype, insertion
        // order preserved. Redundant documentation nodes for one declared
        // member land in the same group and merge into one emitted unit.
        let mut groups: Vec<(PrototypeKey, Vec<&MemberDoc>)> = Vec::new();
        for member in &self.member_funcs {
            let key = member.prototype_key(index, diag);
            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, members)) => members.push(member),
                None => groups.push((key, vec![member])),
            }
        }

        for (_, members) in &groups {
            let documented: Vec<(&MemberDoc, String)> = members
                .iter()
                .filter_map(|m| {
                    let docstring = m.docstring();
                    if docstring.is_empty() {
                        None
                    } else {
                        Some((*m, docstring))
                    }
                })
                .collect();
            if documented.is_empty() {
                continue;
            }

            // The declaration comes from the group's first member; the body
            // defers overload choice to a pointer-identity comparison per
            // documented member, first match wins.
            let body: String = documented
                .iter()
                .map(|(m, docstring)| {
                    emit::member_func_clause(
                        &m.render_return_type(index, self_ref.as_ref(), diag),
                        &prefix,
                        &m.render_prototype_args(index, self_ref.as_ref(), diag),
                        &m.name,
                        docstring,
                    )
                })
                .collect();

            let first = members[0];
            out.push_str(&emit::member_func_doc(
                &combined_template_decl(&self.template_params, first),
                &first.render_return_type(index, self_ref.as_ref(), diag),
                &prefix,
                &first.render_prototype_args(index, self_ref.as_ref(), diag),
                &body,
            ));
        }

        out
    }
}

/// A documented namespace. Emission is a no-op; the namespace exists so that
/// nested typedef and enum references resolve.
#[derive(Debug)]
pub struct NamespaceDoc {
    pub id: String,
    pub name: String,
    #[allow(dead_code)]
    pub typedefs: Vec<Member>,
    #[allow(dead_code)]
    pub enums: Vec<Member>,
}

impl NamespaceDoc {
    pub fn from_compound(
        compound: Compound,
        index: &mut SymbolIndex,
        diag: &mut Diagnostics,
    ) -> Self {
        let mut typedefs = Vec::new();
        let mut enums = Vec::new();
        for member in compound.members {
            match member.kind {
                MemberKind::Typedef => {
                    register_member(&compound.name, &member, index, diag);
                    typedefs.push(member);
                }
                MemberKind::Enum => {
                    register_member(&compound.name, &member, index, diag);
                    register_enum_values(&compound.name, &member, index, diag);
                    enums.push(member);
                }
                _ => {}
            }
        }
        NamespaceDoc {
            id: compound.id,
            name: compound.name,
            typedefs,
            enums,
        }
    }
}

fn register_member(
    container: &str,
    member: &Member,
    index: &mut SymbolIndex,
    diag: &mut Diagnostics,
) {
    index.register(
        Reference {
            id: member.id.clone(),
            name: format!("{}::{}", container, member.name),
        },
        true,
        diag,
    );
}

/// Enum values resolve to the qualified enum name, which is what a type
/// reference to a value prints as.
fn register_enum_values(
    container: &str,
    member: &Member,
    index: &mut SymbolIndex,
    diag: &mut Diagnostics,
) {
    for value_id in &member.enum_values {
        index.register(
            Reference {
                id: value_id.clone(),
                name: format!("{}::{}", container, member.name),
            },
            true,
            diag,
        );
    }
}

/// `<T, N>` — template-argument text from parameter names.
fn template_args(params: &[TemplateParam]) -> String {
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("<{}>", names.join(", "))
}

/// `typename T, int N` — template-declaration text.
fn template_decl(params: &[TemplateParam]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", p.kind, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Declaration covering the container's template parameters plus the
/// member's own.
fn combined_template_decl(class_params: &[TemplateParam], member: &MemberDoc) -> String {
    let combined: Vec<TemplateParam> = class_params
        .iter()
        .chain(member.template_params.iter())
        .cloned()
        .collect();
    template_decl(&combined)
}

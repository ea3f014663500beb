//! Member descriptors — prototype keys, argument rendering, docstrings.

use crate::diag::Diagnostics;
use crate::docstring;
use crate::index::{SelfRef, SymbolIndex};
use crate::model::{DocNode, Member, TemplateParam, TypeExpr};

/// One documentable function-like member, owned by its container.
#[derive(Debug, Clone)]
pub struct MemberDoc {
    #[allow(dead_code)]
    pub id: String,
    pub name: String,
    /// Qualified definition text, used as the reference name in diagnostics.
    pub definition: String,
    pub is_const: bool,
    pub is_static: bool,
    /// True for constructors and destructors, identified by an empty return
    /// type.
    pub special: bool,
    pub return_type: TypeExpr,
    pub params: Vec<TypeExpr>,
    pub template_params: Vec<TemplateParam>,
    pub brief: DocNode,
    pub detailed: DocNode,
}

/// Structural signature used to group overloads for emission. Equality and
/// hashing are structural; two overloads with equal keys are the same
/// emission target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrototypeKey {
    pub return_type: String,
    pub template_params: Vec<TemplateParam>,
    pub params: Vec<String>,
    pub is_const: bool,
}

impl MemberDoc {
    pub fn from_member(member: Member) -> Self {
        let special = member.return_type.is_empty();
        MemberDoc {
            id: member.id,
            name: member.name,
            definition: member.definition,
            is_const: member.is_const,
            is_static: member.is_static,
            special,
            return_type: member.return_type,
            params: member.params,
            template_params: member.template_params,
            brief: member.brief,
            detailed: member.detailed,
        }
    }

    /// Grouping key. Types are rendered without self context so that the key
    /// depends only on the index, not on the emitting container's template
    /// arguments.
    pub fn prototype_key(&self, index: &SymbolIndex, diag: &mut Diagnostics) -> PrototypeKey {
        PrototypeKey {
            return_type: index.render_type(&self.return_type, None, diag),
            template_params: self.template_params.clone(),
            params: self
                .params
                .iter()
                .map(|p| index.render_type(p, None, diag))
                .collect(),
            is_const: self.is_const,
        }
    }

    /// Rendered parameter list, e.g. `int, Foo<T> &`.
    pub fn render_args(
        &self,
        index: &SymbolIndex,
        self_ref: Option<&SelfRef>,
        diag: &mut Diagnostics,
    ) -> String {
        self.params
            .iter()
            .map(|p| index.render_type(p, self_ref, diag))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parenthesized parameter list plus constness, e.g. `(int, int) const`.
    pub fn render_prototype_args(
        &self,
        index: &SymbolIndex,
        self_ref: Option<&SelfRef>,
        diag: &mut Diagnostics,
    ) -> String {
        let suffix = if self.is_const { " const" } else { "" };
        format!("({}){}", self.render_args(index, self_ref, diag), suffix)
    }

    /// Rendered return type. Calling this on a constructor or destructor is
    /// an implementation bug, not a user error.
    pub fn render_return_type(
        &self,
        index: &SymbolIndex,
        self_ref: Option<&SelfRef>,
        diag: &mut Diagnostics,
    ) -> String {
        assert!(
            !self.special,
            "constructors and destructors have no return type: {}",
            self.definition
        );
        index.render_type(&self.return_type, self_ref, diag)
    }

    /// Rendered documentation, `""` for undocumented members.
    pub fn docstring(&self) -> String {
        docstring::render_docstring(&self.brief, &self.detailed)
    }

    pub fn is_destructor(&self) -> bool {
        self.name.starts_with('~')
    }
}

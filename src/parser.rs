//! Doxygen XML parsing — lowers the index and compound documents into the
//! owned data model.
//!
//! The export consists of one `index.xml` listing every compound plus one
//! `<refid>.xml` file per compound, read from the same directory.

use crate::model::{
    Compound, CompoundKind, DocNode, Member, MemberKind, Protection, TemplateParam, TypeExpr,
    TypePart,
};
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Document, Element};
use sxd_document::parser as xml;

/// One entry of the index document.
#[derive(Debug)]
pub struct IndexEntry {
    pub refid: String,
    pub kind: CompoundKind,
}

/// Parse `index.xml` into the list of top-level compounds.
pub fn parse_index(path: &Path) -> Result<Vec<IndexEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let package = xml::parse(&text)
        .map_err(|e| anyhow!("malformed XML in {}: {}", path.display(), e))?;
    let document = package.as_document();
    let root = root_element(document)
        .with_context(|| format!("no root element in {}", path.display()))?;

    let mut entries = Vec::new();
    for compound in children_named(root, "compound") {
        let Some(refid) = compound.attribute_value("refid") else {
            bail!("<compound> without refid in {}", path.display());
        };
        entries.push(IndexEntry {
            refid: refid.to_string(),
            kind: CompoundKind::from_attr(compound.attribute_value("kind")),
        });
    }
    Ok(entries)
}

/// Parse one compound document (`<doxygen><compounddef>...`).
pub fn parse_compound(path: &Path) -> Result<Compound> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_compound_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_compound_str(text: &str) -> Result<Compound> {
    let package = xml::parse(text).map_err(|e| anyhow!("malformed XML: {}", e))?;
    let document = package.as_document();
    let root = root_element(document).context("no root element")?;
    let def = child(root, "compounddef").context("no <compounddef> element")?;

    let Some(id) = def.attribute_value("id") else {
        bail!("<compounddef> without id");
    };
    let name = child(def, "compoundname")
        .map(|e| inner_text(e).trim().to_string())
        .unwrap_or_default();

    let template_params = match child(def, "templateparamlist") {
        Some(tpl) => template_params(tpl)?,
        None => Vec::new(),
    };

    let mut member_elements = Vec::new();
    collect_descendants(def, "memberdef", &mut member_elements);
    let members = member_elements
        .into_iter()
        .map(parse_member)
        .collect::<Result<Vec<_>>>()?;

    Ok(Compound {
        id: id.to_string(),
        name,
        kind: CompoundKind::from_attr(def.attribute_value("kind")),
        prot: Protection::from_attr(def.attribute_value("prot")),
        template_params,
        members,
    })
}

fn parse_member(el: Element) -> Result<Member> {
    let Some(id) = el.attribute_value("id") else {
        bail!("<memberdef> without id");
    };
    let name = child(el, "name")
        .map(|e| inner_text(e).trim().to_string())
        .unwrap_or_default();
    let definition = child(el, "definition")
        .map(|e| inner_text(e).trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| name.clone());

    let template_params = match child(el, "templateparamlist") {
        Some(tpl) => template_params(tpl)?,
        None => Vec::new(),
    };

    let params = children_named(el, "param")
        .into_iter()
        .map(|p| child(p, "type").map(type_expr).unwrap_or_default())
        .collect();

    let enum_values = children_named(el, "enumvalue")
        .into_iter()
        .filter_map(|v| v.attribute_value("id").map(str::to_string))
        .collect();

    Ok(Member {
        id: id.to_string(),
        kind: MemberKind::from_attr(el.attribute_value("kind")),
        prot: Protection::from_attr(el.attribute_value("prot")),
        name,
        definition,
        is_const: el.attribute_value("const") == Some("yes"),
        is_static: el.attribute_value("static") == Some("yes"),
        return_type: child(el, "type").map(type_expr).unwrap_or_default(),
        params,
        template_params,
        enum_values,
        brief: child(el, "briefdescription")
            .map(doc_node)
            .unwrap_or_default(),
        detailed: child(el, "detaileddescription")
            .map(doc_node)
            .unwrap_or_default(),
    })
}

/// Lower a `<type>` element: leading text, then one part per child element
/// (`<ref>` children become cross-reference markers), each with its trailing
/// text.
fn type_expr(el: Element) -> TypeExpr {
    let mut expr = TypeExpr::default();
    for c in el.children() {
        match c {
            ChildOfElement::Text(t) => match expr.parts.last_mut() {
                Some(part) => part.tail.push_str(t.text()),
                None => expr.text.push_str(t.text()),
            },
            ChildOfElement::Element(e) => {
                let refid = if e.name().local_part() == "ref" {
                    e.attribute_value("refid").map(str::to_string)
                } else {
                    None
                };
                expr.parts.push(TypePart {
                    refid,
                    text: inner_text(e),
                    tail: String::new(),
                });
            }
            _ => {}
        }
    }
    expr
}

/// Lower a description element. Trailing text between siblings is dropped,
/// matching the upstream docstring formatter.
fn doc_node(el: Element) -> DocNode {
    let mut node = DocNode::default();
    for c in el.children() {
        match c {
            ChildOfElement::Text(t) if node.children.is_empty() => node.text.push_str(t.text()),
            ChildOfElement::Element(e) => node.children.push(doc_node(e)),
            _ => {}
        }
    }
    node
}

fn template_params(tpl: Element) -> Result<Vec<TemplateParam>> {
    children_named(tpl, "param")
        .into_iter()
        .map(template_param)
        .collect()
}

/// One `<param>` of a `<templateparamlist>`.
///
/// Doxygen sometimes folds the parameter name into the type text (`typename
/// T` with no declname); in that shape the first word is the keyword and the
/// rest is the name. With an explicit declname/defname pair the two must
/// agree.
fn template_param(el: Element) -> Result<TemplateParam> {
    let type_el = child(el, "type").context("template parameter without <type>")?;
    let declname = child(el, "declname").map(|e| inner_text(e).trim().to_string());
    let defname = child(el, "defname").map(|e| inner_text(e).trim().to_string());

    if declname.is_none() && defname.is_none() {
        let typetext = inner_text(type_el);
        let mut words = typetext.trim().splitn(2, char::is_whitespace);
        let first = words.next().unwrap_or("");
        if first == "typename" || first == "class" {
            let name = words.next().map(str::trim).unwrap_or("");
            if name.is_empty() {
                bail!("template parameter `{}` has no name", typetext.trim());
            }
            return Ok(TemplateParam {
                kind: first.to_string(),
                name: name.to_string(),
            });
        }
        // Non-type parameter without a name, e.g. an anonymous `int`.
        return Ok(TemplateParam {
            kind: typetext.trim().to_string(),
            name: String::new(),
        });
    }

    if let (Some(decl), Some(def)) = (&declname, &defname) {
        if decl != def {
            bail!(
                "template parameter declname `{}` and defname `{}` disagree",
                decl,
                def
            );
        }
    }
    Ok(TemplateParam {
        kind: inner_text(type_el).trim().to_string(),
        name: declname.or(defname).unwrap_or_default(),
    })
}

// -- DOM helpers --------------------------------------------------------------

fn root_element(document: Document<'_>) -> Option<Element<'_>> {
    document.root().children().into_iter().find_map(|c| match c {
        ChildOfRoot::Element(e) => Some(e),
        _ => None,
    })
}

fn child<'d>(el: Element<'d>, name: &str) -> Option<Element<'d>> {
    el.children().into_iter().find_map(|c| match c {
        ChildOfElement::Element(e) if e.name().local_part() == name => Some(e),
        _ => None,
    })
}

fn children_named<'d>(el: Element<'d>, name: &str) -> Vec<Element<'d>> {
    el.children()
        .into_iter()
        .filter_map(|c| match c {
            ChildOfElement::Element(e) if e.name().local_part() == name => Some(e),
            _ => None,
        })
        .collect()
}

fn collect_descendants<'d>(el: Element<'d>, name: &str, out: &mut Vec<Element<'d>>) {
    for c in el.children() {
        if let ChildOfElement::Element(e) = c {
            if e.name().local_part() == name {
                out.push(e);
            }
            collect_descendants(e, name, out);
        }
    }
}

/// All descendant text of an element, in document order.
fn inner_text(el: Element) -> String {
    let mut out = String::new();
    append_inner_text(el, &mut out);
    out
}

fn append_inner_text(el: Element, out: &mut String) {
    for c in el.children() {
        match c {
            ChildOfElement::Text(t) => out.push_str(t.text()),
            ChildOfElement::Element(e) => append_inner_text(e, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound_from(xml_text: &str) -> Compound {
        parse_compound_str(xml_text).unwrap()
    }

    #[test]
    fn parses_index_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.xml");
        fs::write(
            &path,
            r#"<?xml version='1.0' encoding='UTF-8'?>
<doxygenindex version="1.9.1">
  <compound refid="structPoint" kind="struct"><name>Point</name></compound>
  <compound refid="namespacens" kind="namespace"><name>ns</name></compound>
  <compound refid="indexpage" kind="page"><name>index</name></compound>
</doxygenindex>"#,
        )
        .unwrap();

        let entries = parse_index(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].refid, "structPoint");
        assert_eq!(entries[0].kind, CompoundKind::Struct);
        assert_eq!(entries[1].kind, CompoundKind::Namespace);
        assert_eq!(entries[2].kind, CompoundKind::Other);
    }

    #[test]
    fn missing_index_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_index(&dir.path().join("absent.xml")).unwrap_err();
        assert!(err.to_string().contains("absent.xml"));
    }

    #[test]
    fn parses_compound_with_function_member() {
        let compound = compound_from(
            r#"<doxygen>
  <compounddef id="structPoint" kind="struct" prot="public">
    <compoundname>Point</compoundname>
    <sectiondef kind="public-func">
      <memberdef kind="function" id="structPoint_1a1" prot="public" static="no" const="yes">
        <type>double</type>
        <definition>double Point::norm</definition>
        <name>norm</name>
        <param><type>int</type></param>
        <briefdescription><para>Euclidean norm.</para></briefdescription>
        <detaileddescription></detaileddescription>
      </memberdef>
    </sectiondef>
  </compounddef>
</doxygen>"#,
        );

        assert_eq!(compound.id, "structPoint");
        assert_eq!(compound.name, "Point");
        assert_eq!(compound.kind, CompoundKind::Struct);
        assert_eq!(compound.prot, Protection::Public);
        assert_eq!(compound.members.len(), 1);

        let member = &compound.members[0];
        assert_eq!(member.kind, MemberKind::Function);
        assert_eq!(member.name, "norm");
        assert_eq!(member.definition, "double Point::norm");
        assert!(member.is_const);
        assert!(!member.is_static);
        assert_eq!(member.return_type.text, "double");
        assert_eq!(member.params.len(), 1);
        assert_eq!(member.params[0].text, "int");
        assert_eq!(member.brief.children[0].text, "Euclidean norm.");
    }

    #[test]
    fn empty_type_element_yields_special_return_type() {
        let compound = compound_from(
            r#"<doxygen>
  <compounddef id="structPoint" kind="struct" prot="public">
    <compoundname>Point</compoundname>
    <sectiondef kind="public-func">
      <memberdef kind="function" id="structPoint_1a1" prot="public" static="no" const="no">
        <type></type>
        <definition>Point::Point</definition>
        <name>Point</name>
      </memberdef>
    </sectiondef>
  </compounddef>
</doxygen>"#,
        );
        assert!(compound.members[0].return_type.is_empty());
    }

    #[test]
    fn type_with_ref_keeps_marker_and_tail() {
        let compound = compound_from(
            r#"<doxygen>
  <compounddef id="classFoo" kind="class" prot="public">
    <compoundname>Foo</compoundname>
    <sectiondef kind="public-func">
      <memberdef kind="function" id="classFoo_1a1" prot="public" static="no" const="no">
        <type>const <ref refid="classBar" kindref="compound">Bar</ref> &amp;</type>
        <definition>const Bar &amp; Foo::bar</definition>
        <name>bar</name>
      </memberdef>
    </sectiondef>
  </compounddef>
</doxygen>"#,
        );
        let rettype = &compound.members[0].return_type;
        assert_eq!(rettype.text, "const ");
        assert_eq!(rettype.parts.len(), 1);
        assert_eq!(rettype.parts[0].refid.as_deref(), Some("classBar"));
        assert_eq!(rettype.parts[0].text, "Bar");
        assert_eq!(rettype.parts[0].tail, " &");
    }

    #[test]
    fn template_parameters_from_folded_type_text() {
        let compound = compound_from(
            r#"<doxygen>
  <compounddef id="classFoo" kind="class" prot="public">
    <compoundname>Foo</compoundname>
    <templateparamlist>
      <param><type>typename T</type></param>
      <param><type>class Derived</type></param>
    </templateparamlist>
  </compounddef>
</doxygen>"#,
        );
        assert_eq!(
            compound.template_params,
            vec![
                TemplateParam {
                    kind: "typename".to_string(),
                    name: "T".to_string()
                },
                TemplateParam {
                    kind: "class".to_string(),
                    name: "Derived".to_string()
                },
            ]
        );
    }

    #[test]
    fn template_parameter_with_declname() {
        let compound = compound_from(
            r#"<doxygen>
  <compounddef id="classFoo" kind="class" prot="public">
    <compoundname>Foo</compoundname>
    <templateparamlist>
      <param><type>int</type><declname>N</declname><defname>N</defname></param>
    </templateparamlist>
  </compounddef>
</doxygen>"#,
        );
        assert_eq!(
            compound.template_params,
            vec![TemplateParam {
                kind: "int".to_string(),
                name: "N".to_string()
            }]
        );
    }

    #[test]
    fn template_parameter_name_mismatch_is_an_error() {
        let result = parse_compound_str(
            r#"<doxygen>
  <compounddef id="classFoo" kind="class" prot="public">
    <compoundname>Foo</compoundname>
    <templateparamlist>
      <param><type>int</type><declname>N</declname><defname>M</defname></param>
    </templateparamlist>
  </compounddef>
</doxygen>"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unnamed_typename_parameter_is_an_error() {
        let result = parse_compound_str(
            r#"<doxygen>
  <compounddef id="classFoo" kind="class" prot="public">
    <compoundname>Foo</compoundname>
    <templateparamlist>
      <param><type>typename</type></param>
    </templateparamlist>
  </compounddef>
</doxygen>"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn enum_member_collects_value_ids() {
        let compound = compound_from(
            r#"<doxygen>
  <compounddef id="namespacens" kind="namespace">
    <compoundname>ns</compoundname>
    <sectiondef kind="enum">
      <memberdef kind="enum" id="namespacens_1amode" prot="public" static="no">
        <type></type>
        <name>Mode</name>
        <enumvalue id="namespacens_1amode_1afast"><name>Fast</name></enumvalue>
        <enumvalue id="namespacens_1amode_1aslow"><name>Slow</name></enumvalue>
      </memberdef>
    </sectiondef>
  </compounddef>
</doxygen>"#,
        );
        let member = &compound.members[0];
        assert_eq!(member.kind, MemberKind::Enum);
        assert_eq!(
            member.enum_values,
            vec![
                "namespacens_1amode_1afast".to_string(),
                "namespacens_1amode_1aslow".to_string()
            ]
        );
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_compound_str("<doxygen><compounddef></doxygen>").is_err());
    }
}

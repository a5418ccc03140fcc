/*
PLCopen TC6 XML writer (quick-xml event API).
Element order inside <LD> follows the body: rails, blocks, contacts, coils, variables.
*/
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::domain::graph::Point;
use crate::domain::plcopen::{
    Block, Coil, Connection, ConnectionPointIn, ConnectionPointOut, Contact, Geometry, InVariable,
    InputSource, LadderBody, LadderPou, LeftPowerRail, OutVariable, RightPowerRail,
};

use super::protocol::PLCOPEN_NAMESPACE;

pub type XmlWriter = Writer<Vec<u8>>;

pub trait ToXml {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()>;
}

fn tag_start(tag: &str, attrs: &[(&str, &str)]) -> BytesStart<'static> {
    let mut start = BytesStart::new(tag.to_string());
    for attr in attrs {
        start.push_attribute(*attr);
    }
    start
}

fn write_start(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    writer.write_event(Event::Start(tag_start(tag, attrs)))?;
    Ok(())
}

fn write_end(writer: &mut XmlWriter, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_empty(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    writer.write_event(Event::Empty(tag_start(tag, attrs)))?;
    Ok(())
}

fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    write_start(writer, tag, &[])?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    write_end(writer, tag)
}

fn write_point(writer: &mut XmlWriter, tag: &str, point: Point) -> Result<()> {
    let x = point.x.to_string();
    let y = point.y.to_string();
    write_empty(writer, tag, &[("x", x.as_str()), ("y", y.as_str())])
}

/// Shared leading attributes: localId (+ extras) + width/height.
fn element_attrs(local_id: &str, geometry: &Geometry, extra: Vec<(&'static str, String)>) -> Vec<(String, String)> {
    let mut attrs = vec![("localId".to_string(), local_id.to_string())];
    attrs.extend(extra.into_iter().map(|(k, v)| (k.to_string(), v)));
    attrs.push(("width".to_string(), geometry.width.to_string()));
    attrs.push(("height".to_string(), geometry.height.to_string()));
    attrs
}

fn borrowed(attrs: &[(String, String)]) -> Vec<(&str, &str)> {
    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

impl ToXml for Connection {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let ref_local_id = self.ref_local_id.to_string();
        let mut attrs = vec![("refLocalId", ref_local_id.as_str())];
        if let Some(parameter) = &self.formal_parameter {
            attrs.push(("formalParameter", parameter.as_str()));
        }
        if self.points.is_empty() {
            return write_empty(writer, "connection", &attrs);
        }
        write_start(writer, "connection", &attrs)?;
        for point in &self.points {
            write_point(writer, "position", *point)?;
        }
        write_end(writer, "connection")
    }
}

impl ToXml for ConnectionPointIn {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        if self.rel_position.is_none() && self.connections.is_empty() {
            return write_empty(writer, "connectionPointIn", &[]);
        }
        write_start(writer, "connectionPointIn", &[])?;
        if let Some(rel) = self.rel_position {
            write_point(writer, "relPosition", rel)?;
        }
        for connection in &self.connections {
            connection.write_xml(writer)?;
        }
        write_end(writer, "connectionPointIn")
    }
}

impl ToXml for ConnectionPointOut {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let mut attrs = Vec::new();
        if let Some(parameter) = &self.formal_parameter {
            attrs.push(("formalParameter", parameter.as_str()));
        }
        match self.rel_position {
            None => write_empty(writer, "connectionPointOut", &attrs),
            Some(rel) => {
                write_start(writer, "connectionPointOut", &attrs)?;
                write_point(writer, "relPosition", rel)?;
                write_end(writer, "connectionPointOut")
            }
        }
    }
}

impl ToXml for LeftPowerRail {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let attrs = element_attrs(&self.local_id.to_string(), &self.geometry, Vec::new());
        write_start(writer, "leftPowerRail", &borrowed(&attrs))?;
        write_point(writer, "position", self.geometry.position)?;
        self.connection_point_out.write_xml(writer)?;
        write_end(writer, "leftPowerRail")
    }
}

impl ToXml for RightPowerRail {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let attrs = element_attrs(&self.local_id.to_string(), &self.geometry, Vec::new());
        write_start(writer, "rightPowerRail", &borrowed(&attrs))?;
        write_point(writer, "position", self.geometry.position)?;
        self.connection_point_in.write_xml(writer)?;
        write_end(writer, "rightPowerRail")
    }
}

impl ToXml for Contact {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let mut extra = vec![("negated", self.negated.to_string())];
        if let Some(edge) = self.edge {
            extra.push(("edge", edge.as_str().to_string()));
        }
        let attrs = element_attrs(&self.local_id.to_string(), &self.geometry, extra);
        write_start(writer, "contact", &borrowed(&attrs))?;
        write_point(writer, "position", self.geometry.position)?;
        self.connection_point_in.write_xml(writer)?;
        self.connection_point_out.write_xml(writer)?;
        write_text_element(writer, "variable", &self.variable)?;
        write_end(writer, "contact")
    }
}

impl ToXml for Coil {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let mut extra = vec![("negated", self.negated.to_string())];
        if let Some(edge) = self.edge {
            extra.push(("edge", edge.as_str().to_string()));
        }
        if let Some(storage) = self.storage {
            extra.push(("storage", storage.as_str().to_string()));
        }
        let attrs = element_attrs(&self.local_id.to_string(), &self.geometry, extra);
        write_start(writer, "coil", &borrowed(&attrs))?;
        write_point(writer, "position", self.geometry.position)?;
        self.connection_point_in.write_xml(writer)?;
        self.connection_point_out.write_xml(writer)?;
        write_text_element(writer, "variable", &self.variable)?;
        write_end(writer, "coil")
    }
}

impl ToXml for Block {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let mut extra = vec![("typeName", self.type_name.clone())];
        if let Some(instance) = &self.instance_name {
            extra.push(("instanceName", instance.clone()));
        }
        let mut attrs = element_attrs(&self.local_id.to_string(), &self.geometry, extra);
        attrs.push(("executionOrderId".to_string(), self.execution_order_id.to_string()));

        write_start(writer, "block", &borrowed(&attrs))?;
        write_point(writer, "position", self.geometry.position)?;

        write_start(writer, "inputVariables", &[])?;
        for input in &self.input_variables {
            write_start(writer, "variable", &[("formalParameter", input.formal_parameter.as_str())])?;
            match &input.source {
                InputSource::Connected(point) => point.write_xml(writer)?,
                // tc6 allows an expression in place of the connection list
                InputSource::Expression(expression) => {
                    write_start(writer, "connectionPointIn", &[])?;
                    write_text_element(writer, "expression", expression)?;
                    write_end(writer, "connectionPointIn")?;
                }
            }
            write_end(writer, "variable")?;
        }
        write_end(writer, "inputVariables")?;

        write_empty(writer, "inOutVariables", &[])?;

        write_start(writer, "outputVariables", &[])?;
        for output in &self.output_variables {
            write_start(writer, "variable", &[("formalParameter", output.formal_parameter.as_str())])?;
            output.connection_point_out.write_xml(writer)?;
            write_end(writer, "variable")?;
        }
        write_end(writer, "outputVariables")?;

        write_end(writer, "block")
    }
}

impl ToXml for InVariable {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let extra = vec![
            ("negated", self.negated.to_string()),
            ("executionOrderId", self.execution_order_id.to_string()),
        ];
        let attrs = element_attrs(&self.local_id.to_string(), &self.geometry, extra);
        write_start(writer, "inVariable", &borrowed(&attrs))?;
        write_point(writer, "position", self.geometry.position)?;
        self.connection_point_out.write_xml(writer)?;
        write_text_element(writer, "expression", &self.expression)?;
        write_end(writer, "inVariable")
    }
}

impl ToXml for OutVariable {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        let extra = vec![
            ("negated", self.negated.to_string()),
            ("executionOrderId", self.execution_order_id.to_string()),
        ];
        let attrs = element_attrs(&self.local_id.to_string(), &self.geometry, extra);
        write_start(writer, "outVariable", &borrowed(&attrs))?;
        write_point(writer, "position", self.geometry.position)?;
        self.connection_point_in.write_xml(writer)?;
        write_text_element(writer, "expression", &self.expression)?;
        write_end(writer, "outVariable")
    }
}

fn write_all<T: ToXml>(writer: &mut XmlWriter, elements: &[T]) -> Result<()> {
    for element in elements {
        element.write_xml(writer)?;
    }
    Ok(())
}

impl ToXml for LadderBody {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        write_start(writer, "LD", &[])?;
        write_all(writer, &self.left_power_rails)?;
        write_all(writer, &self.right_power_rails)?;
        write_all(writer, &self.blocks)?;
        write_all(writer, &self.contacts)?;
        write_all(writer, &self.coils)?;
        write_all(writer, &self.in_variables)?;
        write_all(writer, &self.out_variables)?;
        write_end(writer, "LD")
    }
}

impl ToXml for LadderPou {
    fn write_xml(&self, writer: &mut XmlWriter) -> Result<()> {
        write_start(
            writer,
            "pou",
            &[
                ("xmlns", PLCOPEN_NAMESPACE),
                ("name", self.name.as_str()),
                ("pouType", self.pou_type.as_str()),
            ],
        )?;
        write_start(writer, "body", &[])?;
        self.body.write_xml(writer)?;
        write_end(writer, "body")?;
        write_end(writer, "pou")
    }
}

/// Indented UTF-8 document with an XML declaration.
pub fn write_document(pou: &LadderPou) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    pou.write_xml(&mut writer)?;
    Ok(writer.into_inner())
}

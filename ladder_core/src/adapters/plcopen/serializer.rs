/*
梯级序列化引擎：rung 列表 -> 扁平 LD body
*/
use log::{debug, warn};

use crate::domain::graph::{NodeKind, Rung};
use crate::domain::plcopen::{ExportReport, LadderBody};
use crate::error::{ExportWarning, MalformedGraph, RungFailure};

use super::config::PlcOpenConfig;
use super::emitters::{self, Emitted, RungContext};
use super::offset::{rung_offsets, Offset};
use super::protocol::{
    XmlDialect, BLANK_OUTPUT_PARAMETER, DEFAULT_OUTPUT_PARAMETER, SHARED_RAIL_PARAMETER,
};
use super::topology::RungTopology;

/// LD body 序列化器
#[derive(Debug, Clone)]
pub struct LadderSerializer {
    config: PlcOpenConfig,
}

impl LadderSerializer {
    pub fn new(dialect: XmlDialect) -> Self {
        Self::from_config(PlcOpenConfig::new(dialect))
    }

    pub fn from_config(config: PlcOpenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlcOpenConfig {
        &self.config
    }

    /// 主入口：逐个梯级生成元件，梯级之间按视口高度向下堆叠
    /// A broken rung is reported and skipped; the following rungs keep their offset.
    pub fn serialize(&self, rungs: &[Rung]) -> ExportReport {
        debug!(
            "Serializing {} rungs, dialect: {}",
            rungs.len(),
            self.config.dialect.as_str()
        );

        let mut report = ExportReport::default();
        let offsets = rung_offsets(rungs);

        for ((index, rung), offset) in rungs.iter().enumerate().zip(offsets) {
            match lower_rung(index, rung, offset) {
                Ok(lowered) => {
                    debug!(
                        "rung {} (`{}`): {} elements at y+{}",
                        index,
                        rung.id,
                        lowered.element.element_count(),
                        offset.value()
                    );
                    for warning in &lowered.warnings {
                        warn!("{}", warning);
                    }
                    report.body.append(lowered.element);
                    report.warnings.extend(lowered.warnings);
                }
                Err(error) => {
                    let failure = RungFailure {
                        rung: index,
                        rung_id: rung.id.clone(),
                        error,
                    };
                    warn!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        self.finish(&mut report.body);
        report
    }

    /// 方言后处理
    fn finish(&self, body: &mut LadderBody) {
        if self.config.shared_power_rails {
            share_power_rails(body);
        }
        if !self.config.routing_points {
            strip_routing(body);
        }
        if self.config.blank_default_output {
            blank_default_output(body);
        }
    }
}

/// Lower one rung into its own body. Any marker error discards the whole rung.
fn lower_rung(index: usize, rung: &Rung, offset: Offset) -> Result<Emitted<LadderBody>, MalformedGraph> {
    let topology = RungTopology::build(rung);
    let mut warnings: Vec<ExportWarning> = topology
        .dangling_edges()
        .iter()
        .map(|edge| ExportWarning::DanglingEdge {
            rung: index,
            from: edge.source.clone(),
            to: edge.target.clone(),
        })
        .collect();

    let pairs = topology.pair_markers()?;
    if !pairs.is_empty() {
        debug!("rung {}: {} parallel groups", index, pairs.len());
    }

    let cx = RungContext::new(index, &topology, offset);
    let mut body = LadderBody::default();

    for node in &rung.nodes {
        debug!("rung {}: {} `{}`", index, node.kind.tag(), node.id);
        match &node.kind {
            NodeKind::LeftRail => body.left_power_rails.push(emitters::left_rail(node, &cx)),
            NodeKind::RightRail => body.right_power_rails.push(emitters::right_rail(node, &cx)?),
            NodeKind::Contact { variable, variant } => {
                body.contacts
                    .push(emitters::contact(node, variable, *variant, &cx)?)
            }
            NodeKind::Coil { variable, variant } => {
                body.coils.push(emitters::coil(node, variable, *variant, &cx)?)
            }
            NodeKind::Block(data) => {
                let emitted = emitters::block(node, data, &cx)?;
                warnings.extend(emitted.warnings);
                body.blocks.push(emitted.element);
            }
            NodeKind::VariableIn(data) => {
                body.in_variables.extend(emitters::in_variable(node, data, &cx));
            }
            NodeKind::VariableOut(data) => {
                if let Some(emitted) = emitters::out_variable(node, data, &cx) {
                    warnings.extend(emitted.warnings);
                    body.out_variables.push(emitted.element);
                }
            }
            // 并联标记只存在于编辑器中
            NodeKind::ParallelOpen { .. } | NodeKind::ParallelClose { .. } => {}
            NodeKind::Unknown => warnings.push(ExportWarning::UnknownNodeKind {
                rung: index,
                node: node.id.clone(),
            }),
        }
    }

    Ok(Emitted {
        element: body,
        warnings,
    })
}

/// 只保留第一对电源轨；引用任意左轨的连线改指第一根左轨
fn share_power_rails(body: &mut LadderBody) {
    let left_ids: Vec<u64> = body.left_power_rails.iter().map(|rail| rail.local_id).collect();
    if let Some(&first) = left_ids.first() {
        body.for_each_point_in_mut(|point| {
            for connection in &mut point.connections {
                if left_ids.contains(&connection.ref_local_id) {
                    connection.ref_local_id = first;
                }
            }
        });
    }

    body.left_power_rails.truncate(1);
    body.right_power_rails.truncate(1);
    for rail in &mut body.left_power_rails {
        rail.connection_point_out.formal_parameter = Some(SHARED_RAIL_PARAMETER.to_string());
    }
    for rail in &mut body.right_power_rails {
        rail.connection_point_in.connections.clear();
    }
}

/// 去掉折点与相对位置，只保留引用关系
fn strip_routing(body: &mut LadderBody) {
    body.for_each_point_in_mut(|point| {
        point.rel_position = None;
        for connection in &mut point.connections {
            connection.points.clear();
        }
    });
    body.for_each_point_out_mut(|point| point.rel_position = None);
}

fn blank_default_output(body: &mut LadderBody) {
    let blank = |parameter: &mut Option<String>| {
        if parameter.as_deref() == Some(DEFAULT_OUTPUT_PARAMETER) {
            *parameter = Some(BLANK_OUTPUT_PARAMETER.to_string());
        }
    };

    body.for_each_point_in_mut(|point| {
        for connection in &mut point.connections {
            blank(&mut connection.formal_parameter);
        }
    });
    for block in &mut body.blocks {
        for output in &mut block.output_variables {
            if output.formal_parameter == DEFAULT_OUTPUT_PARAMETER {
                output.formal_parameter = BLANK_OUTPUT_PARAMETER.to_string();
            }
        }
    }
}

// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Double dispatch over the node kinds of a parsed file.
//!
//! Implement the handlers you are interested in; all others do nothing.
//! Handler names are `on_` plus the lowercased `Node::name()`, and G, D and
//! M codes always use two digits (`on_g01`, `on_g36`, `on_d03`).

use crate::ast::*;

#[allow(unused_variables)]
pub trait Visitor {
    // G codes
    fn on_g01(&mut self, node: &Node) {}
    fn on_g02(&mut self, node: &Node) {}
    fn on_g03(&mut self, node: &Node) {}
    fn on_g04(&mut self, node: &Node) {}
    fn on_g36(&mut self, node: &Node) {}
    fn on_g37(&mut self, node: &Node) {}
    fn on_g54(&mut self, node: &Node) {}
    fn on_g55(&mut self, node: &Node) {}
    fn on_g70(&mut self, node: &Node) {}
    fn on_g71(&mut self, node: &Node) {}
    fn on_g74(&mut self, node: &Node) {}
    fn on_g75(&mut self, node: &Node) {}
    fn on_g90(&mut self, node: &Node) {}
    fn on_g91(&mut self, node: &Node) {}

    // D codes
    fn on_d01(&mut self, node: &Node) {}
    fn on_d02(&mut self, node: &Node) {}
    fn on_d03(&mut self, node: &Node) {}
    fn on_dnn(&mut self, node: &Node) {}

    // M codes
    fn on_m02(&mut self, node: &Node) {}

    // coordinate data
    fn on_x(&mut self, node: &Node) {}
    fn on_y(&mut self, node: &Node) {}
    fn on_i(&mut self, node: &Node) {}
    fn on_j(&mut self, node: &Node) {}

    // extended commands
    fn on_fs(&mut self, node: &Node) {}
    fn on_mo(&mut self, node: &Node) {}
    fn on_lp(&mut self, node: &Node) {}
    fn on_adc(&mut self, node: &Node) {}
    fn on_adr(&mut self, node: &Node) {}
    fn on_ado(&mut self, node: &Node) {}
    fn on_adp(&mut self, node: &Node) {}
    fn on_adm(&mut self, node: &Node) {}
    fn on_am(&mut self, node: &Node) {}
}

impl Node {
    /// Call the one handler of `visitor` that matches this node's kind.
    pub fn visit<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match &self.command {
            Command::Gcode(code) => match code {
                GCode::G01 => visitor.on_g01(self),
                GCode::G02 => visitor.on_g02(self),
                GCode::G03 => visitor.on_g03(self),
                GCode::G36 => visitor.on_g36(self),
                GCode::G37 => visitor.on_g37(self),
                GCode::G54 => visitor.on_g54(self),
                GCode::G55 => visitor.on_g55(self),
                GCode::G70 => visitor.on_g70(self),
                GCode::G71 => visitor.on_g71(self),
                GCode::G74 => visitor.on_g74(self),
                GCode::G75 => visitor.on_g75(self),
                GCode::G90 => visitor.on_g90(self),
                GCode::G91 => visitor.on_g91(self),
            },
            Command::Comment(_) => visitor.on_g04(self),
            Command::Dcode(code) => match code {
                DCode::D01 => visitor.on_d01(self),
                DCode::D02 => visitor.on_d02(self),
                DCode::D03 => visitor.on_d03(self),
            },
            Command::SelectAperture(_) => visitor.on_dnn(self),
            Command::Mcode(MCode::M02) => visitor.on_m02(self),
            Command::Coordinate(axis, _) => match axis {
                Axis::X => visitor.on_x(self),
                Axis::Y => visitor.on_y(self),
                Axis::I => visitor.on_i(self),
                Axis::J => visitor.on_j(self),
            },
            Command::FormatSpec(_) => visitor.on_fs(self),
            Command::UnitMode(_) => visitor.on_mo(self),
            Command::LoadPolarity(_) => visitor.on_lp(self),
            Command::ApertureDefinition { aperture, .. } => match aperture {
                Aperture::Circle { .. } => visitor.on_adc(self),
                Aperture::Rectangle { .. } => visitor.on_adr(self),
                Aperture::Obround { .. } => visitor.on_ado(self),
                Aperture::Polygon { .. } => visitor.on_adp(self),
                Aperture::Macro { .. } => visitor.on_adm(self),
            },
            Command::ApertureMacro(_) => visitor.on_am(self),
        }
    }
}

/// Visit `nodes` in order.
pub fn visit_nodes<'a, V: Visitor + ?Sized>(nodes: impl IntoIterator<Item = &'a Node>,
                                            visitor: &mut V) {
    for node in nodes {
        node.visit(visitor);
    }
}

// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;
use itertools::Itertools;
use strum_macros::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// A parsed Gerber file: the commands in the order they appear in the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct File {
    pub nodes: Vec<Node>,
}

impl File {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a File {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Byte range of the source text a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Span { offset, len }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The spanned text, if the span lies within `input`.
    pub fn slice<'i>(&self, input: &'i str) -> Option<&'i str> {
        input.get(self.offset..self.end())
    }
}

impl<'i> From<pest::Span<'i>> for Span {
    fn from(span: pest::Span<'i>) -> Self {
        Span { offset: span.start(), len: span.end() - span.start() }
    }
}

/// A single command of a Gerber file, with its source location.
///
/// Nodes compare equal when their commands are equal; the span is not
/// taken into account, so `G1*` and `G0001*` give equal nodes.
#[derive(Debug, Clone)]
pub struct Node {
    pub command: Command,
    pub span: Span,
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        self.command == other.command
    }
}

impl Node {
    pub fn new(command: Command, span: impl Into<Span>) -> Self {
        Node { command, span: span.into() }
    }

    /// Stable name of the node kind, e.g. `G01`, `Dnn` or `FS`.
    ///
    /// The matching visitor handler is `on_` followed by the lowercased name.
    pub fn name(&self) -> &'static str {
        match &self.command {
            Command::Gcode(code) => (*code).into(),
            Command::Comment(_) => "G04",
            Command::Dcode(code) => (*code).into(),
            Command::SelectAperture(_) => "Dnn",
            Command::Mcode(code) => (*code).into(),
            Command::Coordinate(axis, _) => (*axis).into(),
            Command::FormatSpec(_) => "FS",
            Command::UnitMode(_) => "MO",
            Command::LoadPolarity(_) => "LP",
            Command::ApertureDefinition { aperture, .. } => match aperture {
                Aperture::Circle { .. } => "ADC",
                Aperture::Rectangle { .. } => "ADR",
                Aperture::Obround { .. } => "ADO",
                Aperture::Polygon { .. } => "ADP",
                Aperture::Macro { .. } => "ADM",
            },
            Command::ApertureMacro(_) => "AM",
        }
    }

    /// Family and normalized code of G, D and M nodes.
    pub fn code(&self) -> Option<(Family, u32)> {
        Some(match &self.command {
            Command::Gcode(code) => (Family::G, code.code()),
            Command::Comment(_) => (Family::G, 4),
            Command::Dcode(code) => (Family::D, code.code()),
            Command::SelectAperture(id) => (Family::D, *id),
            Command::Mcode(code) => (Family::M, code.code()),
            _ => return None,
        })
    }
}

/// Opcode letter of the codes that are classified by number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Family {
    G,
    D,
    M,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Gcode(GCode),
    /// G04, with the comment text as written after the code.
    Comment(String),
    Dcode(DCode),
    /// Dnn (nn >= 4): make aperture nn current.
    SelectAperture(u32),
    Mcode(MCode),
    /// Coordinate data word; the value is kept as written since its
    /// meaning depends on the format specification.
    Coordinate(Axis, String),
    FormatSpec(FormatSpec),
    UnitMode(UnitMode),
    LoadPolarity(Polarity),
    ApertureDefinition { id: u32, aperture: Aperture },
    ApertureMacro(ApertureMacro),
}

/// G-codes with a fixed meaning.  G04 carries text and is a `Command::Comment`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, FromRepr, IntoStaticStr)]
#[repr(u32)]
pub enum GCode {
    /// Linear interpolation.
    G01 = 1,
    /// Clockwise circular interpolation.
    G02 = 2,
    /// Counterclockwise circular interpolation.
    G03 = 3,
    /// Begin region.
    G36 = 36,
    /// End region.
    G37 = 37,
    // deprecated
    G54 = 54,
    G55 = 55,
    G70 = 70,
    G71 = 71,
    /// Single quadrant mode.
    G74 = 74,
    /// Multi quadrant mode.
    G75 = 75,
    // deprecated
    G90 = 90,
    G91 = 91,
}

impl GCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, FromRepr, IntoStaticStr)]
#[repr(u32)]
pub enum DCode {
    /// Plot (interpolate) to the given coordinates.
    D01 = 1,
    /// Move to the given coordinates.
    D02 = 2,
    /// Flash the current aperture.
    D03 = 3,
}

impl DCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, FromRepr, IntoStaticStr)]
#[repr(u32)]
pub enum MCode {
    /// End of file.
    M02 = 2,
}

impl MCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Axis {
    X,
    Y,
    /// Arc center offsets.
    I,
    J,
}

/// Contents of a `%FS` statement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FormatSpec {
    pub zeros: Zeros,
    pub notation: Notation,
    pub x_integral: u8,
    pub x_decimal: u8,
    pub y_integral: u8,
    pub y_decimal: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
pub enum Zeros {
    #[strum(serialize = "L")]
    OmitLeading,
    #[strum(serialize = "T")]
    OmitTrailing,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
pub enum Notation {
    #[strum(serialize = "A")]
    Absolute,
    #[strum(serialize = "I")]
    Incremental,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
pub enum UnitMode {
    #[strum(serialize = "IN")]
    Inches,
    #[strum(serialize = "MM")]
    Millimeters,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
pub enum Polarity {
    #[strum(serialize = "D")]
    Dark,
    #[strum(serialize = "C")]
    Clear,
}

/// Aperture template of a `%AD` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Aperture {
    Circle { diameter: f64, hole: Option<f64> },
    Rectangle { width: f64, height: f64, hole: Option<f64> },
    Obround { width: f64, height: f64, hole: Option<f64> },
    Polygon { outer_diameter: f64, vertices: u32, rotation: Option<f64>, hole: Option<f64> },
    /// Instance of an aperture macro defined by `%AM`.
    Macro { name: String, params: Vec<f64> },
}

/// A `%AM` aperture macro definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureMacro {
    pub name: String,
    pub content: Vec<MacroContent>,
}

/// One `*`-terminated statement of a macro body.
#[derive(Debug, Clone, PartialEq)]
pub enum MacroContent {
    /// Primitive code 0.
    Comment(String),
    /// `$n=expression`
    Assignment { variable: u32, expression: String },
    /// Primitive with its (unevaluated) parameter expressions.
    Primitive { code: u32, params: Vec<String> },
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Gcode(code) => write!(f, "{}*", code),
            Command::Comment(text) => write!(f, "G04{}*", text),
            Command::Dcode(code) => write!(f, "{}*", code),
            Command::SelectAperture(id) => write!(f, "D{}*", id),
            Command::Mcode(code) => write!(f, "{}*", code),
            Command::Coordinate(axis, value) => write!(f, "{}{}*", axis, value),
            Command::FormatSpec(fs) => write!(f, "%FS{}{}X{}{}Y{}{}*%", fs.zeros, fs.notation,
                                              fs.x_integral, fs.x_decimal,
                                              fs.y_integral, fs.y_decimal),
            Command::UnitMode(unit) => write!(f, "%MO{}*%", unit),
            Command::LoadPolarity(pol) => write!(f, "%LP{}*%", pol),
            Command::ApertureDefinition { id, aperture } => write!(f, "%ADD{}{}*%", id, aperture),
            Command::ApertureMacro(mac) => {
                write!(f, "%AM{}*", mac.name)?;
                for item in &mac.content {
                    write!(f, "{}*", item)?;
                }
                write!(f, "%")
            }
        }
    }
}

impl fmt::Display for Aperture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (template, params) = match self {
            Aperture::Circle { diameter, hole } =>
                ("C", std::iter::once(*diameter).chain(*hole).collect_vec()),
            Aperture::Rectangle { width, height, hole } =>
                ("R", vec![*width, *height].into_iter().chain(*hole).collect_vec()),
            Aperture::Obround { width, height, hole } =>
                ("O", vec![*width, *height].into_iter().chain(*hole).collect_vec()),
            Aperture::Polygon { outer_diameter, vertices, rotation, hole } => {
                // a hole can only be given together with a rotation
                let rotation = rotation.or(hole.map(|_| 0.));
                ("P", vec![*outer_diameter, *vertices as f64].into_iter()
                     .chain(rotation).chain(*hole).collect_vec())
            }
            Aperture::Macro { name, params } => {
                write!(f, "{}", name)?;
                if !params.is_empty() {
                    write!(f, ",{}", params.iter().join("X"))?;
                }
                return Ok(());
            }
        };
        write!(f, "{},{}", template, params.iter().join("X"))
    }
}

impl fmt::Display for MacroContent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MacroContent::Comment(text) => write!(f, "0 {}", text),
            MacroContent::Assignment { variable, expression } =>
                write!(f, "${}={}", variable, expression),
            MacroContent::Primitive { code, params } => {
                write!(f, "{}", code)?;
                for param in params {
                    write!(f, ",{}", param)?;
                }
                Ok(())
            }
        }
    }
}

// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use itertools::Itertools;
use log::{debug, trace};
use pest_derive::Parser;
use pest::{Parser as _, error::{Error, InputLocation}, iterators::{Pair, Pairs}};

use crate::ast::*;
use crate::error::{Found, SyntaxError, SyntaxErrorKind};
use crate::util::{is_coordinate, is_name, parse_code, parse_decimal};

#[derive(Parser)]
#[grammar = "gerber.pest"]
struct GerberGrammar;

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Gerber parser.
///
/// Holds only configuration, so one parser can be shared between threads
/// and reused for any number of inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    case_sensitive: bool,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    /// Reject lowercase opcode letters (`g01*`), which are accepted by default.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Parse a complete Gerber source into a `File`.
    ///
    /// The first error aborts the parse; no nodes are returned for input
    /// that is not entirely valid.
    pub fn parse(&self, input: &str) -> ParseResult<File> {
        match self.parse_nodes(input) {
            Ok(nodes) => {
                debug!("parsed {} nodes from {} bytes", nodes.len(), input.len());
                Ok(File { nodes })
            }
            Err(e) => {
                debug!("rejected input: {}", e);
                Err(e)
            }
        }
    }

    fn parse_nodes(&self, input: &str) -> ParseResult<Vec<Node>> {
        let builder = Builder { input, case_sensitive: self.case_sensitive };
        match GerberGrammar::parse(Rule::file, input) {
            Ok(pairs) => builder.make_nodes(pairs),
            Err(e) => {
                // the commands before the lexical error come first
                if let Ok(pairs) = GerberGrammar::parse(Rule::items, input) {
                    builder.make_nodes(pairs)?;
                }
                Err(lex_error(input, e))
            }
        }
    }
}

/// Parse with the default configuration.
pub fn parse(input: &str) -> ParseResult<File> {
    Parser::new().parse(input)
}

/// Translate a failure of the grammar into a syntax error.
///
/// The grammar only fails where a command or block is not closed, or on a
/// character that cannot appear at that point.
fn lex_error(input: &str, error: Error<Rule>) -> SyntaxError {
    let offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    let found = input.get(offset..).and_then(|rest| rest.chars().next());
    let kind = match found {
        None => SyntaxErrorKind::Unterminated { found: Found::EndOfInput },
        Some(ch @ ' ') | Some(ch @ '\t') | Some(ch @ '\r') | Some(ch @ '\n') | Some(ch @ '%') =>
            SyntaxErrorKind::Unterminated { found: Found::Char(ch) },
        Some(ch) => SyntaxErrorKind::UnexpectedCharacter(ch),
    };
    let len = found.map_or(0, char::len_utf8);
    SyntaxError::new(input, Span::new(offset, len), kind)
}

/// Per-call state for turning grammar pairs into nodes.
struct Builder<'i> {
    input: &'i str,
    case_sensitive: bool,
}

impl<'i> Builder<'i> {
    fn error(&self, span: impl Into<Span>, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.input, span.into(), kind)
    }

    fn err<T>(&self, span: impl Into<Span>, kind: SyntaxErrorKind) -> ParseResult<T> {
        Err(self.error(span, kind))
    }

    fn malformed(&self, span: impl Into<Span>, command: &'static str,
                 message: impl Into<String>) -> SyntaxError {
        self.error(span, SyntaxErrorKind::MalformedCommand { command, message: message.into() })
    }

    fn push(&self, nodes: &mut Vec<Node>, node: Node) {
        trace!("{:>8} {:<4} {}", node.span.offset, node.name(), node);
        nodes.push(node);
    }

    fn make_nodes(&self, pairs: Pairs<'i, Rule>) -> ParseResult<Vec<Node>> {
        // usually there is one command per line
        let mut nodes = Vec::with_capacity(self.input.lines().count());
        for pair in pairs {
            match pair.as_rule() {
                Rule::command => self.make_command(pair, &mut nodes)?,
                Rule::ext_block => self.make_ext_block(pair, &mut nodes)?,
                Rule::EOI => (),
                _ => unreachable!(),
            }
        }
        Ok(nodes)
    }

    fn make_command(&self, pair: Pair<'i, Rule>, nodes: &mut Vec<Node>) -> ParseResult<()> {
        for pair in pair.into_inner() {
            let node = match pair.as_rule() {
                Rule::comment => self.make_comment(pair)?,
                Rule::word => self.make_word(pair)?,
                _ => unreachable!(),
            };
            self.push(nodes, node);
        }
        Ok(())
    }

    fn make_comment(&self, pair: Pair<'i, Rule>) -> ParseResult<Node> {
        let span = pair.as_span();
        let (text,) = pair.into_inner().collect_tuple().expect("one child");
        if self.case_sensitive && span.as_str().starts_with('g') {
            let opcode = &span.as_str()[..text.as_span().start() - span.start()];
            return self.err(span, SyntaxErrorKind::UnknownOpcode(opcode.into()));
        }
        Ok(Node::new(Command::Comment(text.as_str().into()), span))
    }

    fn make_word(&self, pair: Pair<'i, Rule>) -> ParseResult<Node> {
        let span = pair.as_span();
        let (letter, number) = pair.into_inner().collect_tuple().expect("children");
        let letter = if self.case_sensitive {
            letter.as_str().to_owned()
        } else {
            letter.as_str().to_ascii_uppercase()
        };
        let unknown = || self.error(span, SyntaxErrorKind::UnknownOpcode(span.as_str().into()));
        let code = || parse_code(number.as_str()).ok_or_else(|| {
            self.error(span, SyntaxErrorKind::MalformedNumeral {
                word: span.as_str().into(),
                expected: "an unsigned integer",
            })
        });

        let command = match letter.as_str() {
            "G" => Command::Gcode(GCode::from_repr(code()?).ok_or_else(unknown)?),
            "D" => match code()? {
                0 => return Err(unknown()),
                n => DCode::from_repr(n).map_or(Command::SelectAperture(n), Command::Dcode),
            },
            "M" => Command::Mcode(MCode::from_repr(code()?).ok_or_else(unknown)?),
            other => match other.parse::<Axis>() {
                Ok(axis) => {
                    if !is_coordinate(number.as_str()) {
                        return self.err(span, SyntaxErrorKind::MalformedNumeral {
                            word: span.as_str().into(),
                            expected: "a signed integer",
                        });
                    }
                    Command::Coordinate(axis, number.as_str().into())
                }
                Err(_) => return Err(unknown()),
            },
        };
        Ok(Node::new(command, span))
    }

    fn make_ext_block(&self, pair: Pair<'i, Rule>, nodes: &mut Vec<Node>) -> ParseResult<()> {
        for pair in pair.into_inner() {
            let node = match pair.as_rule() {
                Rule::statement => self.make_statement(pair)?,
                Rule::macro_def => self.make_macro(pair)?,
                _ => unreachable!(),
            };
            self.push(nodes, node);
        }
        Ok(())
    }

    fn make_statement(&self, pair: Pair<'i, Rule>) -> ParseResult<Node> {
        let (code, params) = pair.into_inner().collect_tuple().expect("children");
        // leading blanks and the terminator are not part of the node
        let start = code.as_span().start();
        let span = Span::new(start, params.as_span().end() - start);
        let text = params.as_str();

        let command = match code.as_str() {
            "FS" => Command::FormatSpec(self.make_format_spec(span, text)?),
            "MO" => Command::UnitMode(text.parse().map_err(|_| {
                self.malformed(span, "MO", format!("expected `IN` or `MM`, found `{}`", text))
            })?),
            "LP" => Command::LoadPolarity(text.parse().map_err(|_| {
                self.malformed(span, "LP", format!("expected `D` or `C`, found `{}`", text))
            })?),
            "AD" => self.make_aperture_definition(span, text)?,
            "AM" => return Err(self.malformed(span, "AM", "expected a macro name")),
            other => return self.err(span, SyntaxErrorKind::UnknownOpcode(format!("%{}", other))),
        };
        Ok(Node::new(command, span))
    }

    fn make_format_spec(&self, span: Span, text: &str) -> ParseResult<FormatSpec> {
        let malformed = || self.malformed(span, "FS",
                                          format!("expected `[LT][AI]XnnYnn`, found `{}`", text));
        if text.len() != 8 || !text.is_ascii() || &text[2..3] != "X" || &text[5..6] != "Y" {
            return Err(malformed());
        }
        let digit = |i: usize| text[i..i+1].parse::<u8>().map_err(|_| malformed());
        Ok(FormatSpec {
            zeros: text[0..1].parse().map_err(|_| malformed())?,
            notation: text[1..2].parse().map_err(|_| malformed())?,
            x_integral: digit(3)?,
            x_decimal: digit(4)?,
            y_integral: digit(6)?,
            y_decimal: digit(7)?,
        })
    }

    fn make_aperture_definition(&self, span: Span, text: &str) -> ParseResult<Command> {
        let malformed = |message: String| self.malformed(span, "AD", message);

        let rest = text.strip_prefix('D').ok_or_else(|| {
            malformed(format!("expected `D` and an aperture number, found `{}`", text))
        })?;
        let id_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (id, rest) = rest.split_at(id_len);
        let id = parse_code(id).ok_or_else(|| malformed("missing aperture number".into()))?;
        if id < 10 {
            return Err(malformed(format!("aperture number {} is below 10", id)));
        }

        let (template, params) = match rest.split_once(',') {
            Some((template, params)) => (template, Some(params)),
            None => (rest, None),
        };
        let params = params.map_or(Ok(vec![]), |params| {
            params.split('X').map(|param| {
                parse_decimal(param).ok_or_else(|| malformed(format!("invalid decimal `{}`", param)))
            }).collect::<ParseResult<Vec<f64>>>()
        })?;
        let wrong_count = || malformed(format!("wrong number of parameters for template {}",
                                               template));

        let aperture = match (template, params.as_slice()) {
            ("C", &[diameter]) => Aperture::Circle { diameter, hole: None },
            ("C", &[diameter, hole]) => Aperture::Circle { diameter, hole: Some(hole) },
            ("R", &[width, height]) => Aperture::Rectangle { width, height, hole: None },
            ("R", &[width, height, hole]) => Aperture::Rectangle { width, height, hole: Some(hole) },
            ("O", &[width, height]) => Aperture::Obround { width, height, hole: None },
            ("O", &[width, height, hole]) => Aperture::Obround { width, height, hole: Some(hole) },
            ("P", &[outer_diameter, vertices, ref extra @ ..]) if extra.len() <= 2 => {
                if vertices.fract() != 0. || !(3. ..=12.).contains(&vertices) {
                    return Err(malformed(format!("polygon needs 3 to 12 vertices, not {}",
                                                 vertices)));
                }
                Aperture::Polygon {
                    outer_diameter,
                    vertices: vertices as u32,
                    rotation: extra.get(0).copied(),
                    hole: extra.get(1).copied(),
                }
            }
            ("C", _) | ("R", _) | ("O", _) | ("P", _) => return Err(wrong_count()),
            (name, params) if is_name(name) =>
                Aperture::Macro { name: name.into(), params: params.to_vec() },
            _ => return Err(malformed(format!("invalid aperture template `{}`", template))),
        };
        Ok(Command::ApertureDefinition { id, aperture })
    }

    fn make_macro(&self, pair: Pair<'i, Rule>) -> ParseResult<Node> {
        let span = pair.as_span();
        let mut inner = pair.into_inner();
        let name = inner.next().expect("macro name").as_str().to_owned();
        let content = inner.map(|stmt| {
            let (text,) = stmt.into_inner().collect_tuple().expect("one child");
            self.make_macro_content(text)
        }).collect::<ParseResult<Vec<_>>>()?;
        Ok(Node::new(Command::ApertureMacro(ApertureMacro { name, content }), span))
    }

    fn make_macro_content(&self, pair: Pair<'i, Rule>) -> ParseResult<MacroContent> {
        let span = pair.as_span();
        // statements may be broken over several lines
        let body = pair.as_str().chars().filter(|&ch| ch != '\r' && ch != '\n').collect::<String>();
        let body = body.trim();
        let malformed = |message: String| self.malformed(span, "AM", message);

        if let Some(assignment) = body.strip_prefix('$') {
            let (variable, expression) = assignment.split_once('=').ok_or_else(|| {
                malformed(format!("expected `$n=expression`, found `{}`", body))
            })?;
            let variable = parse_code(variable.trim()).ok_or_else(|| {
                malformed(format!("invalid variable `${}`", variable.trim()))
            })?;
            return Ok(MacroContent::Assignment { variable, expression: expression.trim().into() });
        }

        let code_len = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
        let (code, rest) = body.split_at(code_len);
        let code = parse_code(code).ok_or_else(|| {
            malformed(format!("expected a primitive code, found `{}`", body))
        })?;
        match code {
            0 => Ok(MacroContent::Comment(rest.trim_start().into())),
            1 | 2 | 4 | 5 | 6 | 7 | 20 | 21 | 22 => {
                let params = match rest.strip_prefix(',') {
                    Some(params) => params.split(',').map(|p| p.trim().to_owned()).collect(),
                    None if rest.trim().is_empty() =>
                        return Err(malformed(format!("primitive {} needs parameters", code))),
                    None => return Err(malformed(format!("expected `,` after primitive code {}",
                                                         code))),
                };
                Ok(MacroContent::Primitive { code, params })
            }
            _ => Err(malformed(format!("unknown macro primitive code {}", code))),
        }
    }
}

// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! A parser for Gerber (RS-274X) files, the format used to describe the
//! layers of printed circuit boards for fabrication.
//!
//! It parses the textual program into a flat, ordered list of typed command
//! nodes, using the Pest parser library for the lexical structure.  Node
//! kinds can be handled with a [`visit::Visitor`].
//!
//! ## Basic usage
//!
//! Use `gerber::parse::parse` (or a configured `gerber::parse::Parser`) to
//! get a `File`, then work with the datastructures from `gerber::ast`.
//!
//! The following code (similar to the "gerber-parse" demo binary) takes a
//! file as an argument, parses it and outputs one command per line, in a
//! consistent format.
//!
//! ```rust,no_run
//! use std::{env, fs};
//! use gerber::parse::parse;
//!
//! fn main() {
//!     let filename = env::args().nth(1).unwrap();
//!     let input = fs::read_to_string(&filename).unwrap();
//!
//!     match parse(&input) {
//!         Err(e) => eprintln!("Parse error: {}", e.with_path(filename)),
//!         Ok(file) => print!("{}", file),
//!     }
//! }
//! ```
//!
//! ## Supported commands
//!
//! G01-G03, G04 comments, G36/G37, G74/G75 and the deprecated G54, G55,
//! G70, G71, G90 and G91; D01-D03 and aperture selection; M02; coordinate
//! words X, Y, I and J; and the extended commands FS, MO, LP, AD and AM.
//! Attribute commands (TF, TA, TO, TD) and step-and-repeat are not
//! supported yet.

pub mod ast;
pub mod error;
pub mod parse;
pub mod visit;

// internal helpers
pub(crate) mod util;

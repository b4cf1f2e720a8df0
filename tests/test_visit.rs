// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use strum::IntoEnumIterator;

use gerber::ast::*;
use gerber::parse::parse;
use gerber::visit::{Visitor, visit_nodes};

/// Records every handler call together with the node it got.
#[derive(Default)]
struct Recorder {
    calls: Vec<(&'static str, Node)>,
}

macro_rules! record {
    ($($handler:ident),*) => {
        $(
            fn $handler(&mut self, node: &Node) {
                self.calls.push((stringify!($handler), node.clone()));
            }
        )*
    }
}

impl Visitor for Recorder {
    record!(on_g01, on_g02, on_g03, on_g04, on_g36, on_g37, on_g54, on_g55, on_g70, on_g71,
            on_g74, on_g75, on_g90, on_g91,
            on_d01, on_d02, on_d03, on_dnn, on_m02,
            on_x, on_y, on_i, on_j,
            on_fs, on_mo, on_lp, on_adc, on_adr, on_ado, on_adp, on_adm, on_am);
}

fn handler_for(node: &Node) -> String {
    format!("on_{}", node.name().to_lowercase())
}

#[test]
fn test_visit_g_codes() {
    for code in GCode::iter() {
        let file = parse(&format!("G{}*", code.code())).unwrap();
        let node = &file.nodes[0];

        let mut recorder = Recorder::default();
        node.visit(&mut recorder);
        assert_eq!(recorder.calls.len(), 1);
        assert_eq!(recorder.calls[0].0, format!("on_g{:02}", code.code()));
        assert_eq!(&recorder.calls[0].1, node);
        assert_eq!(recorder.calls[0].1.span, node.span);
    }
}

#[test]
fn test_visit_padded_repetitions() {
    let file = parse("G37*G037*G0037*G00037*").unwrap();
    assert_eq!(file.len(), 4);

    let mut recorder = Recorder::default();
    visit_nodes(&file, &mut recorder);
    assert!(recorder.calls.iter().all(|(handler, _)| *handler == "on_g37"));
    let offsets = recorder.calls.iter().map(|(_, node)| node.span.offset).collect::<Vec<_>>();
    assert_eq!(offsets, [0, 4, 9, 15]);
}

#[test]
fn test_visit_every_kind() {
    let src = "G04 all kinds*G01*G02*G03*G36*G37*G54*G55*G70*G71*G74*G75*G90*G91*\
               %FSLAX26Y26*MOMM*%%LPD*%%LPC*%\
               %ADD10C,1*%%ADD11R,1X2*%%ADD12O,1X2*%%ADD13P,1X5*%%ADD14BOX,1*%\
               %AMBOX*21,1,$1,$1,0,0,0*%\
               D10*X1Y2I3J4D01*D02*D03*M02*";
    let file = parse(src).unwrap();

    let mut recorder = Recorder::default();
    visit_nodes(&file, &mut recorder);
    assert_eq!(recorder.calls.len(), file.len());
    for ((handler, visited), node) in recorder.calls.iter().zip(&file) {
        assert_eq!(*handler, handler_for(node));
        assert_eq!(visited, node);
    }

    let mut handlers = recorder.calls.iter().map(|(handler, _)| *handler).collect::<Vec<_>>();
    handlers.sort_unstable();
    handlers.dedup();
    assert_eq!(handlers.len(), 32);
}

#[test]
fn test_partial_visitor() {
    #[derive(Default)]
    struct Flashes(usize);

    impl Visitor for Flashes {
        fn on_d03(&mut self, _: &Node) {
            self.0 += 1;
        }
    }

    let file = parse("%ADD10C,1*%D10*X0Y0D03*X100Y0D01*D3*D003*M02*").unwrap();
    let mut flashes = Flashes::default();
    visit_nodes(&file, &mut flashes);
    assert_eq!(flashes.0, 3);

    // also through a trait object
    let visitor: &mut dyn Visitor = &mut flashes;
    file.nodes[4].visit(visitor);
    assert_eq!(flashes.0, 4);
}

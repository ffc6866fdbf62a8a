//! Layered schedule.
//!
//! The check nodes are processed layer by layer. Within a layer the check
//! nodes touch disjoint variable nodes, so they are processed lane by lane in
//! the order the hardware uses, and each check node writes its APP values
//! back immediately. Later layers of the same iteration therefore see the
//! updated APP values.
//!
//! For each edge the variable-to-check message is `t = APP - R_old`
//! (saturated to the APP range), the check node computes `R_new` from the
//! `t` values, and the APP memory is updated with `APP = t + R_new`
//! (saturated to the APP range).

use super::{arithmetic::DecoderArithmetic, check_node::CheckNodeUnit, state::StateStore};
use crate::code::CodeStructure;
use log::trace;

/// Performs one layered iteration.
///
/// Returns the number of parity checks satisfied by the hard decisions of
/// the APP values at the end of the iteration.
pub fn decode_layered<A: DecoderArithmetic>(
    arithmetic: &A,
    code: &CodeStructure,
    store: &mut StateStore<A::Llr>,
    unit: &mut CheckNodeUnit<A::Llr>,
    iteration: usize,
) -> usize {
    let z = code.block_size();
    let lanes = store.lanes();
    for layer in 0..code.num_layers() {
        for lane in 0..lanes {
            for row in (lane..z).step_by(lanes) {
                process_check_node(arithmetic, code, store, unit, layer * z + row);
            }
        }
    }
    let satisfied = code.satisfied_checks(|v| arithmetic.hard_decision(store.app.get(v)));
    trace!("layered iteration {iteration}: {satisfied} parity checks satisfied");
    satisfied
}

fn process_check_node<A: DecoderArithmetic>(
    arithmetic: &A,
    code: &CodeStructure,
    store: &mut StateStore<A::Llr>,
    unit: &mut CheckNodeUnit<A::Llr>,
    check: usize,
) {
    let base = check * code.max_check_degree();
    unit.load(code, check);
    for (slot, &v) in unit.variables.iter().enumerate() {
        let t = arithmetic.saturating_sub_app(store.app.get(v), store.messages.get(base + slot));
        unit.inputs.push(t);
    }
    unit.update(arithmetic);
    for (slot, (&v, (&t, &r))) in unit
        .variables
        .iter()
        .zip(unit.inputs.iter().zip(unit.outputs.iter()))
        .enumerate()
    {
        store.messages.set(base + slot, r);
        store.app.set(v, arithmetic.saturating_add_app(t, r));
    }
}

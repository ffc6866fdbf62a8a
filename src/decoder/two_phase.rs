//! Two-phase schedule.
//!
//! At the start of each iteration the APP memory is copied to the APP
//! snapshot memory. All the check nodes read their inputs from the snapshot,
//! and their message updates `R_new - R_old` are accumulated per variable
//! node. At the end of the iteration the APP memory is set to the snapshot
//! plus the accumulated updates, saturated once to the APP range.
//!
//! The number of satisfied parity checks reported for an iteration is
//! computed on the snapshot, that is, on the hard decisions at the start of
//! the iteration.

use super::{arithmetic::DecoderArithmetic, check_node::CheckNodeUnit, state::StateStore};
use crate::code::CodeStructure;
use log::trace;
use num_traits::Zero;

/// Performs one two-phase iteration.
///
/// Returns the number of parity checks satisfied by the hard decisions of
/// the APP values at the start of the iteration.
pub fn decode_two_phase<A: DecoderArithmetic>(
    arithmetic: &A,
    code: &CodeStructure,
    store: &mut StateStore<A::Llr>,
    unit: &mut CheckNodeUnit<A::Llr>,
    iteration: usize,
) -> usize {
    let StateStore {
        app,
        messages,
        app_parity_check,
        accumulator,
    } = store;
    app_parity_check.copy_from(app);
    let satisfied =
        code.satisfied_checks(|v| arithmetic.hard_decision(app_parity_check.get(v)));
    accumulator.fill(A::Llr::zero());

    let z = code.block_size();
    let lanes = app.lanes();
    for layer in 0..code.num_layers() {
        for lane in 0..lanes {
            for row in (lane..z).step_by(lanes) {
                let check = layer * z + row;
                let base = check * code.max_check_degree();
                unit.load(code, check);
                for (slot, &v) in unit.variables.iter().enumerate() {
                    let t = arithmetic
                        .saturating_sub_app(app_parity_check.get(v), messages.get(base + slot));
                    unit.inputs.push(t);
                }
                unit.update(arithmetic);
                for (slot, (&v, &r)) in unit.variables.iter().zip(unit.outputs.iter()).enumerate()
                {
                    let old = messages.get(base + slot);
                    accumulator[v] = accumulator[v] + (r - old);
                    messages.set(base + slot, r);
                }
            }
        }
    }

    for (v, &delta) in accumulator.iter().enumerate() {
        app.set(v, arithmetic.saturate_app(app_parity_check.get(v) + delta));
    }
    trace!("two-phase iteration {iteration}: {satisfied} parity checks satisfied at start");
    satisfied
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::code::CodeStructureBuilder;
    use crate::decoder::{
        arithmetic::FixedPoint,
        config::{CheckNodeAlgorithm, DecoderConfig, SchedulingMode},
        quantization::Quantization,
    };

    fn small_code() -> CodeStructure {
        CodeStructureBuilder {
            num_variable_nodes: 4,
            num_check_nodes: 4,
            max_check_degree: 2,
            block_size: 2,
            num_systematic_bits: 2,
            is_irregular_repeat_accumulate: false,
            layer_degrees: &[2, 2],
            base_addresses: &[0, 1, 0, 1],
            cyclic_shifts: &[0, 0, 0, 1],
        }
        .build()
        .unwrap()
    }

    #[test]
    fn all_checks_read_the_snapshot() {
        let code = small_code();
        let config = DecoderConfig {
            scheduling: SchedulingMode::TwoPhase,
            check_node_algorithm: CheckNodeAlgorithm::MinSum,
            ..Default::default()
        };
        let arithmetic = FixedPoint::new(Quantization::new(6, 8, 2).unwrap(), 0.75);
        let mut store = StateStore::new(&code, &config).unwrap();
        store.load_channel(&code, &arithmetic, &[4, 6, -2, 8]);
        let mut unit = CheckNodeUnit::new(CheckNodeAlgorithm::MinSum, 2, 2);

        let satisfied = decode_two_phase(&arithmetic, &code, &mut store, &mut unit, 0);
        // the snapshot has v2 negative: checks {0, 2} and {1, 2} fail
        assert_eq!(satisfied, 2);
        // checks {0, 2} {1, 3} {0, 3} {1, 2} send
        //   [-2, 4] [8, 6] [8, 4] [-2, 6]
        let app = (0..4).map(|v| store.app.get(v)).collect::<Vec<_>>();
        assert_eq!(app, [10, 12, 8, 18]);
        assert_eq!(store.app_parity_check.get(2), -2);

        let satisfied = decode_two_phase(&arithmetic, &code, &mut store, &mut unit, 1);
        assert_eq!(satisfied, 4);
    }

    #[test]
    fn single_saturation() {
        let code = small_code();
        let config = DecoderConfig {
            scheduling: SchedulingMode::TwoPhase,
            check_node_algorithm: CheckNodeAlgorithm::MinSum,
            extrinsic_bit_width: 6,
            app_bit_width: 6,
            ..Default::default()
        };
        let arithmetic = FixedPoint::new(config.quantization().unwrap(), 0.75);
        let mut store = StateStore::new(&code, &config).unwrap();
        store.load_channel(&code, &arithmetic, &[31, 31, 31, 31]);
        let mut unit = CheckNodeUnit::new(CheckNodeAlgorithm::MinSum, 2, 2);
        decode_two_phase(&arithmetic, &code, &mut store, &mut unit, 0);
        let app = (0..4).map(|v| store.app.get(v)).collect::<Vec<_>>();
        assert_eq!(app, [31; 4]);
    }
}

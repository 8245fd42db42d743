//! End-to-end exercise of the demo circuit: two clicked inputs, a
//! concatenating transaction into a FIFO, and a copying transaction
//! draining the FIFO into a clicked output.

use sched::modules::demo_circuit;

#[test]
fn pressed_inputs_emerge_concatenated_at_the_output() {
    let (mut circuit, ports) = demo_circuit().expect("demo circuit should build");

    ports.in1_line.set(bits::word!(1, 1));
    ports.in2_line.set(bits::word!(1, 0));

    let mut busy_cycles = 0;
    for cycle in 0..8 {
        // Press both input buttons for the first cycle only, and
        // click the output button every other cycle.
        let press_inputs = cycle == 0;
        ports.in1_button.set(press_inputs);
        ports.in2_button.set(press_inputs);
        ports.out_button.set(cycle % 2 == 0);

        let report = circuit.step().expect("step should succeed");
        if !report.granted.is_empty() {
            busy_cycles += 1;
        }
        if cycle < 3 {
            // Nothing can have been latched yet: the captures arm
            // after the button edge is recognized, the FIFO fills a
            // cycle later, and the drain needs one more cycle.
            assert_eq!(ports.out_probe.get().value(), 0);
        }
    }

    // in1 occupies the low bit, in2 the high bit.
    let latched = ports.out_probe.get();
    assert_eq!(latched.width().bits(), 2);
    assert_eq!(latched.value(), 0b01);

    // Exactly two transactions fired: one concatenating push, one
    // draining copy.  A single button press must not be double
    // counted by either side.
    assert_eq!(busy_cycles, 2);
}

#[test]
fn output_never_latches_without_a_drain_click() {
    let (mut circuit, ports) = demo_circuit().expect("demo circuit should build");

    ports.in1_line.set(bits::word!(1, 1));
    ports.in2_line.set(bits::word!(1, 1));

    let mut busy_cycles = 0;
    for cycle in 0..8 {
        let press_inputs = cycle == 0;
        ports.in1_button.set(press_inputs);
        ports.in2_button.set(press_inputs);

        let report = circuit.step().expect("step should succeed");
        if !report.granted.is_empty() {
            busy_cycles += 1;
        }
    }

    // The word made it into the FIFO (the concatenating transaction
    // fired once) but the output latch never moved.
    assert_eq!(busy_cycles, 1);
    assert_eq!(ports.out_probe.get().value(), 0);
}

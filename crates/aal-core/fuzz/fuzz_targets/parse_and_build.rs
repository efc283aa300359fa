#![no_main]

use aal_core::{parse_line, EngineConfig, Machine, Program, ScriptedInput};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for line in text.lines() {
        if let Ok(instruction) = parse_line(line) {
            let rendered = instruction.render(8);
            let again = parse_line(&rendered).expect("rendered line parses");
            assert_eq!(again.opcode, instruction.opcode);
        }
    }

    let Ok(program) = Program::from_source(text) else {
        return;
    };
    let _ = program.render();

    let mut machine = Machine::new(EngineConfig::default().with_step_limit(10_000));
    let mut input = ScriptedInput::from_values(&[1, -1, 0, 999_999]);
    let _ = machine.run(&program, &mut input, &mut std::io::sink());
});

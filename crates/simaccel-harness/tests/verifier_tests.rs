//! Integration tests: full runs and the directed scenario, driven
//! against the simulated device exactly as the CLI drives it.

use simaccel_chip::{layout, regs};
use simaccel_harness::prelude::*;
use simaccel_harness::{read_word, GeneratorConfig, Transaction};

#[test]
fn full_run_passes_on_direct_path() {
    let scenario = TestScenario {
        generator: GeneratorConfig {
            count: 1000,
            seed: 0xC0FFEE,
            ..GeneratorConfig::default()
        },
        ..TestScenario::default()
    };
    let mut device = SimAccelDevice::for_scenario(&scenario);
    let result = Verifier::new(scenario).run(&mut device).unwrap();
    assert!(result.passed(), "mismatches: {:?}", result.mismatches);
    assert_eq!(result.transactions, 1000);
}

#[test]
fn runs_reproduce_from_the_same_seed() {
    let run = |seed| {
        let scenario = TestScenario {
            generator: GeneratorConfig {
                count: 300,
                seed,
                ..GeneratorConfig::default()
            },
            ..TestScenario::default()
        };
        let mut device = SimAccelDevice::for_scenario(&scenario);
        Verifier::new(scenario).run(&mut device).unwrap()
    };
    let a = run(11);
    let b = run(11);
    assert_eq!(a.passed(), b.passed());
    assert_eq!(a.polls, b.polls);
}

/// The directed scenario, spelled out literally: 32 random bytes at
/// 0x10000, DMA to 0x21000, status polled at config base + 32.
#[test]
fn directed_dma_scenario_literal() {
    let mut device = SimAccelDevice::with_defaults();

    let payload: Vec<u8> = (0..32u8).map(|i| i.wrapping_mul(37).wrapping_add(5)).collect();
    for (i, chunk) in payload.chunks(4).enumerate() {
        device.write(0x10000 + (i * 4) as u32, chunk).unwrap();
    }

    let configurator = DirectConfigurator::new(layout::CONFIG_BASE);
    configurator
        .configure(
            &mut device,
            &DmaJob {
                src: 0x10000,
                dst: 0x21000,
                length: 32,
            },
        )
        .unwrap();

    let polls = CompletionPoller::new(100)
        .await_nonzero(&mut device, &configurator)
        .unwrap();
    assert!(polls >= 1);
    assert_eq!(
        read_word(&mut device, layout::CONFIG_BASE + regs::STATUS).unwrap(),
        1
    );

    let mut actual = Vec::new();
    for i in 0..8 {
        actual.extend(device.read(0x21000 + i * 4, 4).unwrap());
    }
    assert_eq!(actual, payload);
}

#[test]
fn non_responding_status_register_times_out() {
    // Completion latency far beyond the poll budget models a hung device.
    let mut device = SimAccelDevice::with_defaults().with_completion_latency(u32::MAX);
    let configurator = DirectConfigurator::new(layout::CONFIG_BASE);
    configurator
        .configure(
            &mut device,
            &DmaJob {
                src: 0x10000,
                dst: 0x21000,
                length: 4,
            },
        )
        .unwrap();

    let err = CompletionPoller::new(50)
        .await_nonzero(&mut device, &configurator)
        .unwrap_err();
    assert!(matches!(err, HarnessError::PollTimeout { polls: 50 }));
}

#[test]
fn boundary_transfers() {
    let mut device = SimAccelDevice::with_defaults();
    let top = (1u32 << 18) - 1;

    // One byte at the very last address succeeds.
    device.write(top, &[0x5A]).unwrap();
    assert_eq!(device.read(top, 1).unwrap(), vec![0x5A]);

    // Crossing the end of the address space is rejected, not truncated.
    let err = device.write(top, &[1, 2]).unwrap_err();
    assert!(matches!(err, HarnessError::AddressOutOfRange { .. }));
    let err = device.read(top, 2).unwrap_err();
    assert!(matches!(err, HarnessError::AddressOutOfRange { .. }));
}

/// After the random phase, every address the golden model says was
/// touched reads back to exactly the modeled value.
#[test]
fn random_phase_leaves_device_and_model_in_agreement() {
    let config = GeneratorConfig {
        count: 2000,
        seed: 77,
        ..GeneratorConfig::default()
    };
    let mut device = SimAccelDevice::with_defaults();
    let mut golden = GoldenMemory::new(18);
    let mut touched = std::collections::BTreeSet::new();

    for tx in TransactionGenerator::new(config, 1 << 18) {
        match tx {
            Transaction::Write { addr, data } => {
                device.write(addr, &data).unwrap();
                golden.update(addr, &data);
                for a in addr..addr + data.len() as u32 {
                    touched.insert(a);
                }
            }
            Transaction::Read { addr, len } => {
                let actual = device.read(addr, len).unwrap();
                assert!(golden.compare(addr, &actual).is_empty());
            }
        }
    }

    for addr in touched {
        let byte = device.read(addr, 1).unwrap();
        assert_eq!(byte.as_slice(), golden.expected(addr, 1));
    }
}

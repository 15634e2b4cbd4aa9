use criterion::{Criterion, criterion_group, criterion_main};
use hcstat_core::money::round_cost;
use hcstat_core::types::{ModelName, TokenCounts, UsageRecord};
use hcstat_pricing::{CostCalculator, PricingEntry, PricingTable, UNIT_1_M};
use std::hint::black_box;
use std::path::Path;

fn create_test_pricing() -> PricingEntry {
    PricingEntry {
        model: ModelName::new("gemini-2.0-flash"),
        input_price: 0.10,
        output_price: 0.40,
        unit: UNIT_1_M,
    }
}

fn benchmark_cost_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cost_calculation");

    // Benchmark direct cost calculation from pricing
    group.bench_function("calculate_from_pricing", |b| {
        let tokens = TokenCounts::new(1_290, 41);
        let pricing = create_test_pricing();

        b.iter(|| {
            let _cost =
                CostCalculator::calculate_from_pricing(black_box(&tokens), black_box(&pricing));
        });
    });

    group.bench_function("calculate_large_tokens", |b| {
        let tokens = TokenCounts::new(1_000_000, 500_000);
        let pricing = create_test_pricing();

        b.iter(|| {
            let _cost =
                CostCalculator::calculate_from_pricing(black_box(&tokens), black_box(&pricing));
        });
    });

    // Benchmark lookup plus calculation
    group.bench_function("calculate_with_lookup", |b| {
        let calculator = CostCalculator::new(PricingTable::builtin());
        let tokens = TokenCounts::new(1_290, 41);

        b.iter(|| {
            let _cost = calculator.calculate(black_box("gemini-2.5-flash-preview-04-17"), &tokens);
        });
    });

    group.bench_function("round_cost", |b| {
        b.iter(|| round_cost(black_box(0.123_456_789)));
    });

    group.finish();
}

fn benchmark_record_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_parsing");

    let path = Path::new("challenge/shot_model_answer.json");
    let body = br#"{
        "candidates": [{"content": {"parts": [{"text": "```json\n{\"challenge_prompt\": \"x\", \"coordinates\": []}\n```"}], "role": "model"}}],
        "modelVersion": "gemini-2.0-flash",
        "usageMetadata": {"promptTokenCount": 1290, "candidatesTokenCount": 41, "totalTokenCount": 1331}
    }"#;

    group.bench_function("parse_record", |b| {
        b.iter(|| {
            let _record = UsageRecord::from_slice(path, black_box(body)).unwrap();
        });
    });

    group.finish();
}

fn benchmark_batch_cost_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_cost_calculation");

    // Benchmark calculating costs for multiple records
    group.bench_function("calculate_100_records", |b| {
        let pricing = create_test_pricing();
        let records: Vec<TokenCounts> = (0..100)
            .map(|i| TokenCounts::new((i * 1_000) as u64, (i * 40) as u64))
            .collect();

        b.iter(|| {
            let mut total_cost = 0.0;
            for tokens in &records {
                let cost =
                    CostCalculator::calculate_from_pricing(black_box(tokens), black_box(&pricing));
                total_cost = round_cost(total_cost + cost.total_cost);
            }
            black_box(total_cost)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_cost_calculation,
    benchmark_record_parsing,
    benchmark_batch_cost_calculation
);
criterion_main!(benches);

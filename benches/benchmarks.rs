criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        rendering_flight_field,
        rendering_flight_status,
        deciding_crash,
        settling_crowded_round,
        decoding_inbound_intents,
}

fn rendering_flight_field(c: &mut criterion::Criterion) {
    c.bench_function("render the 20x15 flight field", |b| {
        b.iter(|| Field::from(4.35).to_string())
    });
}

fn rendering_flight_status(c: &mut criterion::Criterion) {
    let notice = Notice::Flight {
        multiplier: 4.35,
        win: 413,
        players: 12,
        total: 3150,
        history: vec![1.2, 7.75, 2.05, 10.1, 3.3],
    };
    c.bench_function("render a player's flight status", |b| {
        b.iter(|| notice.to_string())
    });
}

fn deciding_crash(c: &mut criterion::Criterion) {
    let config = Config::default();
    let ref mut rng = SmallRng::seed_from_u64(0);
    c.bench_function("climb and decide the crash for one tick", |b| {
        b.iter(|| {
            let mut speed = Speed::sample(&config, rng);
            let multiplier = 2.0 + speed.step(&config);
            speed.drift(&config, rng);
            Crash::should_end(&config, multiplier, rng)
        })
    });
}

fn settling_crowded_round(c: &mut criterion::Criterion) {
    let mut round = Round::default();
    round.reset();
    round.open();
    round.launch();
    round.climb(3.0);
    round.crash();
    c.bench_function("settle a round with 1000 players", |b| {
        b.iter_batched(
            || {
                let mut sessions = Sessions::default();
                (0..1000).for_each(|chat| sessions.entry(chat).stake(100));
                sessions
            },
            |mut sessions| Engine::settle(&mut sessions, &round),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn decoding_inbound_intents(c: &mut criterion::Criterion) {
    let inbound = [
        Inbound::Message("/bet@liftoff_bot 250".to_string()),
        Inbound::Message("75".to_string()),
        Inbound::Callback("bet_500".to_string()),
        Inbound::Callback("cashout".to_string()),
    ];
    c.bench_function("decode inbound intents", |b| {
        b.iter(|| {
            inbound
                .iter()
                .filter(|i| Intent::try_from(*i).is_ok())
                .count()
        })
    });
}

use liftoff::actions::*;
use liftoff::engine::*;
use liftoff::notify::*;
use liftoff::state::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

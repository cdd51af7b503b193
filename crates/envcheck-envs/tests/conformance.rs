use envcheck::prelude::*;
use envcheck::env::unpack;
use envcheck_envs::registry;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_safety_ball_reach_contract() {
    let registry = registry();
    let mut env = registry.make("SafetyBallReach-v0").unwrap();
    let observation_space = env.observation_space().unwrap();
    let action_space = env.action_space().unwrap();

    let [obs, info] = unpack::<2>("reset", env.reset(Some(0))).unwrap();
    assert!(observation_space.contains(&obs));
    assert!(matches!(info, Value::Dict(_)));

    let mut rng = StdRng::seed_from_u64(0);
    let action = action_space.sample(&mut rng);
    let fields = unpack::<5>("step", env.step(&action)).unwrap();
    assert!(observation_space.contains(&fields[0]));

    let result = StepResult::from_fields(fields).unwrap();
    assert!(result.info.contains_key("cost"));
    assert!(result.cost().unwrap() >= 0.0);
}

#[test]
fn test_safety_car_circle_full_episode() {
    let registry = registry();
    let mut env = registry.make("SafetyCarCircle-v0").unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let summary = run_episode(&mut *env, &RolloutConfig::default().seed(1), &mut rng).unwrap();
    assert_eq!(summary.steps, 500);
    assert!(summary.total_cost >= 0.0);

    // A second episode starts from zero again
    let again = run_episode(&mut *env, &RolloutConfig::default(), &mut rng).unwrap();
    assert_eq!(again.steps, 500);
}

#[test]
fn test_every_marker_env_passes_check_env() {
    let registry = registry();
    let config = CheckConfig::default().skip_render_check(false).seed(7);

    for id in SuiteConfig::default().check_ids(&registry) {
        let mut env = registry.make(&id).unwrap();
        let report = check_env(&mut *env, &config).unwrap_or_else(|e| panic!("{}: {}", id, e));
        assert!(report.is_clean(), "{}: {:?}", id, report.diagnostics);
    }
}

#[test]
fn test_check_suite_skips_unmarked_envs() {
    let registry = registry();
    let reports = check_suite(
        &registry,
        &SuiteConfig::default(),
        &CheckConfig::default().seed(3),
        &NoOpLogger,
    )
    .unwrap();

    assert_eq!(reports.len(), 24);
    assert!(reports.iter().all(|(id, _)| id.contains("Safety")));
}

#[test]
fn test_suite_rollouts_stay_within_bounds() {
    let registry = registry();
    let suite = SuiteConfig::default();
    let summaries =
        run_suite(&registry, &suite, &RolloutConfig::default().seed(11), &NoOpLogger).unwrap();

    let ids: Vec<&str> = summaries.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids.len(), 24);
    assert_eq!(&ids[..16], suite.enumerated_ids().as_slice());
    assert!(ids[16..].iter().all(|id| id.ends_with("-v1")));

    for (id, summary) in &summaries {
        assert!(summary.steps > 0, "{}", id);
        assert!(summary.total_cost >= 0.0, "{}", id);
    }
}

#[test]
fn test_cartpole_checks_clean_with_ansi_render() {
    let registry = registry();
    let mut env = registry.make("CartPole-v1").unwrap();
    let config = CheckConfig::default().skip_render_check(false).headless(true);
    let report = check_env(&mut *env, &config).unwrap();
    assert!(report.is_clean());
}

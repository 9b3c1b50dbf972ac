// Shared test helpers

use fleetstats::models::*;

pub fn instance(state: InstanceState, pairs: &[(&str, &str)]) -> Instance {
    Instance {
        id: 0,
        host: "localhost".into(),
        port: 2001,
        state,
        statistics: Some(pairs.iter().copied().collect()),
    }
}

pub fn running(pairs: &[(&str, &str)]) -> Instance {
    instance(InstanceState::Running, pairs)
}

pub fn stopped(pairs: &[(&str, &str)]) -> Instance {
    instance(InstanceState::Stopped, pairs)
}

/// Instance that has not reported statistics yet.
pub fn silent(state: InstanceState) -> Instance {
    Instance {
        state,
        statistics: None,
        ..Default::default()
    }
}

pub fn application(instances: Vec<Instance>) -> Application {
    Application {
        name: "Orders".into(),
        instances,
    }
}

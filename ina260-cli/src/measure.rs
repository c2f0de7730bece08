use std::time::Duration;

use ina260::{Ina260, Measurement, Transport};

/// One line of readings; a failed read shows as ERR without stopping the rest.
fn reading_line<T: Transport>(ina: &mut Ina260<T>) -> String {
    let fields: Vec<String> = [Measurement::Voltage, Measurement::Current, Measurement::Power]
        .into_iter()
        .map(|m| match ina.read_measurement(m) {
            Ok(value) => format!("{m}: {value:.2} {}", m.unit()),
            Err(e) => {
                tracing::debug!(error = %e, "{m} unavailable");
                format!("{m}: ERR")
            }
        })
        .collect();
    fields.join("  ")
}

pub(crate) fn action<T: Transport>(ina: &mut Ina260<T>, count: usize, interval: Duration) {
    for n in 0..count {
        println!("{}", reading_line(ina));
        if n + 1 < count {
            std::thread::sleep(interval);
        }
    }
}

//! Time-of-day activity curves per building class.

use crate::domain::{BuildingClass, ClassProfile};

/// Gaussian bump centred on `mu`, 1.0 at the centre
pub fn bump(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma.max(0.01);
    (-0.5 * z * z).exp()
}

/// Logistic step from 0 to 1 around `centre`
pub fn ramp(x: f64, centre: f64, width: f64) -> f64 {
    1.0 / (1.0 + (-(x - centre) / width.max(0.01)).exp())
}

/// Smooth opening-hours window: ~1 between `open` and `close`, ~0 outside
pub fn window(x: f64, open: f64, close: f64, width: f64) -> f64 {
    ramp(x, open, width) * (1.0 - ramp(x, close, width))
}

/// Share of daytime activity at fractional hour `hour` (0.0 to 24.0), in [0, 1]
pub fn activity(class: BuildingClass, hour: f64) -> f64 {
    use BuildingClass::*;

    let level = match class {
        Residential => {
            let morning = 0.6 * bump(hour, 7.0, 1.5);
            let daytime = 0.3 * window(hour, 9.0, 17.0, 1.0);
            let evening = bump(hour, 20.0, 2.2);
            morning.max(daytime).max(evening)
        }
        Apartment => {
            let morning = 0.55 * bump(hour, 7.5, 1.5);
            let daytime = 0.35 * window(hour, 9.0, 18.0, 1.0);
            let evening = bump(hour, 21.0, 2.2);
            morning.max(daytime).max(evening)
        }
        Office => window(hour, 8.0, 18.0, 0.5) * (1.0 - 0.15 * bump(hour, 13.0, 0.7)),
        Commercial => window(hour, 9.0, 21.0, 0.6),
        Retail => window(hour, 10.0, 22.0, 0.5) * (0.8 + 0.2 * bump(hour, 19.0, 2.5)),
        Restaurant => {
            let service = 0.4 * window(hour, 10.0, 22.5, 0.5);
            service.max(bump(hour, 12.5, 1.2)).max(bump(hour, 19.5, 1.5))
        }
        Hotel => 0.5 * window(hour, 6.0, 23.0, 1.0) + 0.5 * bump(hour, 20.0, 2.5),
        Hospital => 0.85 + 0.15 * window(hour, 8.0, 18.0, 1.0),
        Clinic => window(hour, 8.0, 17.0, 0.4),
        // classes end mid-afternoon, so the drop is sharp
        School => window(hour, 7.0, 15.0, 0.15),
        Industrial => 0.8 + 0.2 * window(hour, 7.0, 19.0, 0.8),
        Factory => 0.7 + 0.3 * window(hour, 7.0, 23.0, 0.5),
        Warehouse => window(hour, 6.0, 20.0, 0.8),
    };
    level.clamp(0.0, 1.0)
}

/// `night_factor + (1 - night_factor) * activity`
pub fn diurnal_factor(class: BuildingClass, profile: &ClassProfile, hour: f64) -> f64 {
    profile.night_factor + (1.0 - profile.night_factor) * activity(class, hour)
}

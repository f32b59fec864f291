//! In-memory steam tables with linear interpolation.

use crate::error::{FluidError, FluidResult};
use crate::steam::{SaturationProps, SteamTable, SuperheatedProperty, SuperheatedProps};
use kf_core::lerp;
use kf_core::units::{Pressure, Temperature, as_deg_c, as_kpa, deg_c};

const BISECTION_MAX_ITERS: usize = 200;
const BISECTION_TOL_C: f64 = 1e-10;

/// One row of a saturated water/steam table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturatedRow {
    pub t_c: f64,
    pub p_kpa: f64,
    pub hf: f64,
    pub hg: f64,
    pub sf: f64,
    pub sg: f64,
    pub vf: f64,
    pub vg: f64,
}

/// One row of a superheated steam table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperheatedRow {
    pub t_c: f64,
    pub p_kpa: f64,
    pub h: f64,
    pub s: f64,
}

#[derive(Debug, Clone)]
struct Isobar {
    p_kpa: f64,
    rows: Vec<SuperheatedRow>,
}

impl Isobar {
    fn t_range(&self) -> (f64, f64) {
        let first = self.rows.first().map_or(f64::NAN, |r| r.t_c);
        let last = self.rows.last().map_or(f64::NAN, |r| r.t_c);
        (first, last)
    }

    fn at(&self, t_c: f64) -> Option<SuperheatedProps> {
        let i = bracket(&self.rows, t_c, |r| r.t_c)?;
        let (a, b) = (&self.rows[i], &self.rows[i + 1]);
        Some(SuperheatedProps {
            h: lerp(t_c, a.t_c, b.t_c, a.h, b.h),
            s: lerp(t_c, a.t_c, b.t_c, a.s, b.s),
        })
    }
}

/// Steam tables held in memory.
///
/// Saturated properties interpolate linearly in pressure. Superheated
/// properties interpolate in temperature along the two isobars bracketing the
/// query pressure, then linearly between them. Queries outside the tabulated
/// ranges fail with [`FluidError::OutOfRange`].
#[derive(Debug, Clone)]
pub struct TabulatedSteam {
    saturated: Vec<SaturatedRow>,
    isobars: Vec<Isobar>,
}

impl TabulatedSteam {
    /// Build a table from raw rows in any order.
    pub fn new(
        mut saturated: Vec<SaturatedRow>,
        superheated: Vec<SuperheatedRow>,
    ) -> FluidResult<Self> {
        if saturated.len() < 2 {
            return Err(FluidError::MissingData {
                what: "saturated table needs at least two rows",
            });
        }
        if superheated.is_empty() {
            return Err(FluidError::MissingData {
                what: "superheated table is empty",
            });
        }
        if saturated
            .iter()
            .any(|r| !(r.p_kpa.is_finite() && r.p_kpa > 0.0 && r.vg > r.vf && r.hg > r.hf))
        {
            return Err(FluidError::NonPhysical {
                what: "saturated row",
            });
        }
        saturated.sort_by(|a, b| a.p_kpa.total_cmp(&b.p_kpa));

        let mut isobars: Vec<Isobar> = Vec::new();
        for row in superheated {
            match isobars.iter_mut().find(|iso| iso.p_kpa == row.p_kpa) {
                Some(iso) => iso.rows.push(row),
                None => isobars.push(Isobar {
                    p_kpa: row.p_kpa,
                    rows: vec![row],
                }),
            }
        }
        for iso in &mut isobars {
            iso.rows.sort_by(|a, b| a.t_c.total_cmp(&b.t_c));
        }
        isobars.sort_by(|a, b| a.p_kpa.total_cmp(&b.p_kpa));

        Ok(Self { saturated, isobars })
    }

    /// Pressure span covered by the saturated table [kPa].
    pub fn saturation_range_kpa(&self) -> (f64, f64) {
        let lo = self.saturated.first().map_or(f64::NAN, |r| r.p_kpa);
        let hi = self.saturated.last().map_or(f64::NAN, |r| r.p_kpa);
        (lo, hi)
    }

    /// Isobars available in the superheated table [kPa].
    pub fn isobars_kpa(&self) -> Vec<f64> {
        self.isobars.iter().map(|iso| iso.p_kpa).collect()
    }

    /// A compact excerpt of the standard water tables covering the pressures
    /// of common Rankine exercises (8 kPa to 10 MPa).
    pub fn reference() -> Self {
        let saturated = [
            (41.51, 8.0, 173.88, 2577.0, 0.5926, 8.2287, 0.001008, 18.10),
            (45.81, 10.0, 191.83, 2584.7, 0.6493, 8.1502, 0.001010, 14.67),
            (99.63, 100.0, 417.46, 2675.5, 1.3026, 7.3594, 0.001043, 1.694),
            (179.91, 1000.0, 762.81, 2778.1, 2.1387, 6.5865, 0.001127, 0.1944),
            (275.64, 6000.0, 1213.35, 2784.3, 3.0267, 5.8892, 0.001319, 0.03244),
            (295.06, 8000.0, 1316.64, 2758.0, 3.2068, 5.7432, 0.001384, 0.02352),
            (311.06, 10000.0, 1407.56, 2724.7, 3.3596, 5.6141, 0.001452, 0.01803),
        ]
        .into_iter()
        .map(|(t_c, p_kpa, hf, hg, sf, sg, vf, vg)| SaturatedRow {
            t_c,
            p_kpa,
            hf,
            hg,
            sf,
            sg,
            vf,
            vg,
        })
        .collect();

        let isobars: [(f64, &[(f64, f64, f64)]); 4] = [
            (
                10.0,
                &[
                    (50.0, 2592.6, 8.1749),
                    (100.0, 2687.5, 8.4479),
                    (200.0, 2879.5, 8.9038),
                    (300.0, 3076.5, 9.2813),
                    (400.0, 3279.6, 9.6077),
                    (500.0, 3489.1, 9.8978),
                ],
            ),
            (
                1000.0,
                &[
                    (200.0, 2827.9, 6.6940),
                    (300.0, 3051.2, 7.1229),
                    (400.0, 3263.9, 7.4651),
                    (500.0, 3478.5, 7.7622),
                ],
            ),
            (
                8000.0,
                &[
                    (300.0, 2785.0, 5.7906),
                    (350.0, 2987.3, 6.1301),
                    (400.0, 3138.3, 6.3634),
                    (450.0, 3272.0, 6.5551),
                    (500.0, 3398.3, 6.7240),
                ],
            ),
            (
                10000.0,
                &[
                    (350.0, 2923.4, 5.9443),
                    (400.0, 3096.5, 6.2120),
                    (450.0, 3240.9, 6.4190),
                    (500.0, 3373.7, 6.5966),
                ],
            ),
        ];
        // Rows above are already ordered by pressure and temperature.
        let isobars = isobars
            .iter()
            .map(|&(p_kpa, rows)| Isobar {
                p_kpa,
                rows: rows
                    .iter()
                    .map(|&(t_c, h, s)| SuperheatedRow { t_c, p_kpa, h, s })
                    .collect(),
            })
            .collect();

        Self { saturated, isobars }
    }

    /// Isobars bracketing `p_kpa` as (lower, upper); equal when `p_kpa` is tabulated.
    fn isobar_pair(&self, p_kpa: f64) -> FluidResult<(&Isobar, &Isobar)> {
        if let Some(iso) = self.isobars.iter().find(|iso| iso.p_kpa == p_kpa) {
            return Ok((iso, iso));
        }
        let i = bracket(&self.isobars, p_kpa, |iso| iso.p_kpa).ok_or_else(|| {
            FluidError::OutOfRange {
                what: format!("p = {p_kpa} kPa is outside the superheated table"),
            }
        })?;
        Ok((&self.isobars[i], &self.isobars[i + 1]))
    }
}

/// Index `i` such that `key(items[i]) <= x <= key(items[i + 1])`.
fn bracket<T>(items: &[T], x: f64, key: impl Fn(&T) -> f64) -> Option<usize> {
    if items.len() < 2 || !x.is_finite() {
        return None;
    }
    items
        .windows(2)
        .position(|w| key(&w[0]) <= x && x <= key(&w[1]))
}

impl SteamTable for TabulatedSteam {
    fn saturation(&self, p: Pressure) -> FluidResult<SaturationProps> {
        let p_kpa = as_kpa(p);
        let i = bracket(&self.saturated, p_kpa, |r| r.p_kpa).ok_or_else(|| {
            FluidError::OutOfRange {
                what: format!("p = {p_kpa} kPa is outside the saturated table"),
            }
        })?;
        let (a, b) = (&self.saturated[i], &self.saturated[i + 1]);
        let at = |ya: f64, yb: f64| lerp(p_kpa, a.p_kpa, b.p_kpa, ya, yb);
        Ok(SaturationProps {
            t_sat: at(a.t_c, b.t_c),
            hf: at(a.hf, b.hf),
            hg: at(a.hg, b.hg),
            sf: at(a.sf, b.sf),
            sg: at(a.sg, b.sg),
            vf: at(a.vf, b.vf),
            vg: at(a.vg, b.vg),
        })
    }

    fn superheated(&self, p: Pressure, t: Temperature) -> FluidResult<SuperheatedProps> {
        let p_kpa = as_kpa(p);
        let t_c = as_deg_c(t);
        let (lo, hi) = self.isobar_pair(p_kpa)?;
        let out_of_range = |iso: &Isobar| FluidError::OutOfRange {
            what: format!(
                "T = {t_c} C is outside the {} kPa superheated isobar",
                iso.p_kpa
            ),
        };
        let a = lo.at(t_c).ok_or_else(|| out_of_range(lo))?;
        let b = hi.at(t_c).ok_or_else(|| out_of_range(hi))?;
        Ok(SuperheatedProps {
            h: lerp(p_kpa, lo.p_kpa, hi.p_kpa, a.h, b.h),
            s: lerp(p_kpa, lo.p_kpa, hi.p_kpa, a.s, b.s),
        })
    }

    fn superheated_temperature(
        &self,
        p: Pressure,
        property: SuperheatedProperty,
    ) -> FluidResult<Temperature> {
        let (lo, hi) = self.isobar_pair(as_kpa(p))?;
        let (lo_min, lo_max) = lo.t_range();
        let (hi_min, hi_max) = hi.t_range();
        let mut t_lo = lo_min.max(hi_min);
        let mut t_hi = lo_max.min(hi_max);
        if !(t_lo < t_hi) {
            return Err(FluidError::MissingData {
                what: "bracketing isobars share no temperature span",
            });
        }

        let (target, pick): (f64, fn(&SuperheatedProps) -> f64) = match property {
            SuperheatedProperty::Enthalpy(h) => (h, |sp| sp.h),
            SuperheatedProperty::Entropy(s) => (s, |sp| sp.s),
        };
        let f = |t_c: f64| -> FluidResult<f64> {
            Ok(pick(&self.superheated(p, deg_c(t_c))?) - target)
        };

        let mut f_lo = f(t_lo)?;
        let f_hi = f(t_hi)?;
        if f_lo == 0.0 {
            return Ok(deg_c(t_lo));
        }
        if f_hi == 0.0 {
            return Ok(deg_c(t_hi));
        }
        if f_lo.signum() == f_hi.signum() {
            return Err(FluidError::OutOfRange {
                what: format!("{target} is outside the superheated table at this pressure"),
            });
        }

        for _ in 0..BISECTION_MAX_ITERS {
            let mid = 0.5 * (t_lo + t_hi);
            let f_mid = f(mid)?;
            if f_mid == 0.0 || (t_hi - t_lo) < BISECTION_TOL_C {
                return Ok(deg_c(mid));
            }
            if f_mid.signum() == f_lo.signum() {
                t_lo = mid;
                f_lo = f_mid;
            } else {
                t_hi = mid;
            }
        }
        Err(FluidError::ConvergenceFailed {
            what: "superheated temperature inversion",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kf_core::units::kpa;

    #[test]
    fn saturation_at_tabulated_pressure_is_exact() {
        let table = TabulatedSteam::reference();
        let sat = table.saturation(kpa(8000.0)).unwrap();
        assert_eq!(sat.hg, 2758.0);
        assert_eq!(sat.sg, 5.7432);
        assert_eq!(sat.t_sat, 295.06);
    }

    #[test]
    fn saturation_interpolates_between_rows() {
        let table = TabulatedSteam::reference();
        let sat = table.saturation(kpa(9.0)).unwrap();
        assert!((sat.hf - 0.5 * (173.88 + 191.83)).abs() < 1e-9);
    }

    #[test]
    fn saturation_below_table_is_out_of_range() {
        let table = TabulatedSteam::reference();
        let err = table.saturation(kpa(1.0)).unwrap_err();
        assert!(matches!(err, FluidError::OutOfRange { .. }));
    }

    #[test]
    fn superheated_interpolates_in_temperature() {
        let table = TabulatedSteam::reference();
        let sp = table.superheated(kpa(8000.0), deg_c(425.0)).unwrap();
        assert!((sp.h - 0.5 * (3138.3 + 3272.0)).abs() < 1e-9);
    }

    #[test]
    fn superheated_interpolates_between_isobars() {
        let table = TabulatedSteam::reference();
        let sp = table.superheated(kpa(9000.0), deg_c(400.0)).unwrap();
        assert!((sp.h - 0.5 * (3138.3 + 3096.5)).abs() < 1e-9);
    }

    #[test]
    fn inverse_lookup_recovers_temperature() {
        let table = TabulatedSteam::reference();
        let t = table
            .superheated_temperature(kpa(10.0), SuperheatedProperty::Entropy(8.9038))
            .unwrap();
        assert!((as_deg_c(t) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn empty_data_is_missing() {
        let err = TabulatedSteam::new(Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, FluidError::MissingData { .. }));
    }
}

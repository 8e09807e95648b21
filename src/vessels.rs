/// Everything vessel and channel related for the inland vessel estimator that estimates squat and grounding-limited speeds for marine vessels in confined waterways.
/// Author: G0rocks
/// Date: 2025-06-12

use crate::*;   // To use everything from the crate
use std::fmt;   // For formatting

// Structs and Enums
//----------------------------------------------------
/// Struct to hold the vessel geometry.
/// All dimensional values use uom units, the coefficients are dimensionless.
/// The geometry is set once per scenario and never mutated, derived values live in [ChannelState].
pub struct VesselGeometry {
    /// Vessel length between perpendiculars
    pub length: uom::si::f64::Length,
    /// Vessel width
    pub breadth: uom::si::f64::Length,
    /// Bow draught
    pub draught_bow: uom::si::f64::Length,
    /// Stern draught
    pub draught_stern: uom::si::f64::Length,
    /// Load displacement
    pub displacement: uom::si::f64::Mass,
    /// Waterplane coefficient [-]. If None, calculated from the block coefficient
    pub waterplane_coefficient: Option<f64>,
    /// Midship section coefficient [-]. If None, calculated from the block coefficient
    pub midship_coefficient: Option<f64>,
    /// Number of propellers
    pub num_propellers: u32,
    /// Inland ships generally do not have a bulbous bow, set to false. If the ship has a bulbous bow, set to true
    pub bulbous_bow: bool,
    /// Whether the ship has a transom stern
    pub transom_stern: bool,
}

impl VesselGeometry {
    /// Creates a new VesselGeometry
    pub fn new(length: uom::si::f64::Length, breadth: uom::si::f64::Length, draught_bow: uom::si::f64::Length, draught_stern: uom::si::f64::Length, displacement: uom::si::f64::Mass, waterplane_coefficient: Option<f64>, midship_coefficient: Option<f64>, num_propellers: u32, bulbous_bow: bool, transom_stern: bool) -> VesselGeometry {
        VesselGeometry {
            length,
            breadth,
            draught_bow,
            draught_stern,
            displacement,
            waterplane_coefficient,
            midship_coefficient,
            num_propellers,
            bulbous_bow,
            transom_stern,
        }
    }

    /// Mean draught Tm = (Tb+Ts)/2
    pub fn mean_draught(&self) -> uom::si::f64::Length {
        return (self.draught_bow + self.draught_stern) / 2.0;
    }
}

/// Struct to hold the waterway cross-section geometry.
/// Note:
/// For an unrestricted channel: trench height hT = 0; inverse bank slope Nb = 0; width W >= Weff
/// For a restricted channel: W <= Weff; 0 < hT < h0+Dwl; Nb >= 0
/// For a canal: W <= Weff; hT = h0+Dwl; Nb >= 0
pub struct ChannelGeometry {
    /// Density of the surrounding water in [t/m^3]
    pub water_density: f64,
    /// Design water level
    pub design_water_level: uom::si::f64::Length,
    /// Water depth
    pub water_depth: uom::si::f64::Length,
    /// Height of the trench. Clamped down to h0+Dwl if the input exceeds that bound
    pub trench_height: uom::si::f64::Length,
    /// Channel width
    pub width: uom::si::f64::Length,
    /// Inverse bank slope in [m/m]
    pub inverse_bank_slope: f64,
    /// The water column above the waterway bed reserved to prevent the ship grounding due to squatting while sailing.
    /// Depends on the waterway bed material and ship type, e.g. 0.2 m for a tanker on a sandy bed and 0.3 m on a rocky bed (Van Dorsser et al.)
    pub safety_margin: uom::si::f64::Length,
}

impl ChannelGeometry {
    /// Creates a new ChannelGeometry
    pub fn new(water_density: f64, design_water_level: uom::si::f64::Length, water_depth: uom::si::f64::Length, trench_height: uom::si::f64::Length, width: uom::si::f64::Length, inverse_bank_slope: f64, safety_margin: uom::si::f64::Length) -> ChannelGeometry {
        ChannelGeometry {
            water_density,
            design_water_level,
            water_depth,
            trench_height,
            width,
            inverse_bank_slope,
            safety_margin,
        }
    }

    /// Total water depth h0+Dwl
    pub fn total_depth(&self) -> uom::si::f64::Length {
        return self.water_depth + self.design_water_level;
    }
}

/// The channel type, derived from the trench height, never chosen by the caller
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelType {
    /// hT = 0
    Unrestricted,
    /// 0 < hT < h0+Dwl
    Restricted,
    /// hT = h0+Dwl
    Canal,
}

/// Struct to hold the channel state derived from a [VesselGeometry] and a [ChannelGeometry].
/// Computed once per scenario by [ChannelState::derive] and must be derived again if any geometry field changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelState {
    /// Mean draught Tm
    pub mean_draught: uom::si::f64::Length,
    /// Total water depth h0+Dwl
    pub total_depth: uom::si::f64::Length,
    /// Underkeel clearance ratio Ukc = (h0+Dwl)/Tm [-]
    pub underkeel_clearance: f64,
    /// Block coefficient C_B [-]
    pub block_coefficient: f64,
    /// Waterplane coefficient C_WP [-], as given or derived
    pub waterplane_coefficient: f64,
    /// Midship section coefficient C_M [-], as given or derived
    pub midship_coefficient: f64,
    /// Midship section area As
    pub midship_area: uom::si::f64::Area,
    /// Channel effective width Weff
    pub effective_width: uom::si::f64::Length,
    /// Trench height hT after clamping to h0+Dwl
    pub trench_height: uom::si::f64::Length,
    /// Channel cross-section area Ach
    pub section_area: uom::si::f64::Area,
    /// Critical speed coefficient Kch for the unrestricted channel [-]
    pub unrestricted_coefficient: f64,
    /// Critical speed coefficient Kc for the restricted channel [-]
    pub restricted_coefficient: f64,
    /// Mean water depth hm (rectangular section)
    pub mean_depth: uom::si::f64::Length,
    /// Mean water depth hmT (restricted channel)
    pub trench_mean_depth: uom::si::f64::Length,
    /// Critical speed Vcr
    pub critical_speed: uom::si::f64::Velocity,
    /// Limit speed Vlim, equal to the critical speed (parts of the literature use 0.9*Vcr)
    pub limit_speed: uom::si::f64::Velocity,
}

/// Struct to hold the squat candidates of one speed evaluation.
/// One fresh result per speed query, nothing is cached across speeds.
#[derive(Debug, Clone, Copy)]
pub struct SquatResult {
    /// Depth based Froude number Fnh [-]
    pub froude_number: f64,
    /// Bow squat from the Hooft formula (unrestricted channel)
    pub hooft_bow: uom::si::f64::Length,
    /// Bow squat from the Römisch formula (unrestricted channel and canal)
    pub romisch_bow: uom::si::f64::Length,
    /// Stern squat from the Römisch formula
    pub romisch_stern: uom::si::f64::Length,
    /// Bow squat from the Ankudinov formula (restricted channel and canal)
    pub ankudinov_bow: uom::si::f64::Length,
    /// Stern squat from the Ankudinov formula
    pub ankudinov_stern: uom::si::f64::Length,
    /// The governing squat, the maximum over the candidates that apply to the channel type
    pub governing: uom::si::f64::Length,
}

/// std::Display for SquatResult
impl fmt::Display for SquatResult {
    /// format for SquatResult
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "governing squat: {:.3} m at Fnh = {:.3}", self.governing.get::<uom::si::length::meter>(), self.froude_number)
    }
}

// Implementation of the ChannelState struct
//----------------------------------------------------
impl ChannelState {
    /// Derives the channel state from the vessel and channel geometry:
    /// - Tm: mean draught (m)
    /// - Ukc: underkeel clearance = (h0+Dwl)/Tm
    /// - C_B: block coefficient, C_WP and C_M derived from it when not given
    /// - As: midship section (m2)
    /// - Weff: channel effective width (m)
    /// - Ach: channel section (m2)
    /// - Kch, Kc: critical speed coefficients
    /// - hm, hmT: mean water depths
    /// - Vcr: critical speed (m/s)
    /// - Vlim: limit speed (m/s)
    ///
    /// Deterministic and idempotent: deriving twice from unchanged inputs reproduces identical values.
    /// Returns a ConfigurationError when the channel type implied by W vs Weff contradicts hT/Nb,
    /// when Npro is 0 or when a physical dimension is not positive.
    /// Returns a DomainError when 1-As/Ach leaves the arccos domain [-1,1].
    pub fn derive(vessel: &VesselGeometry, channel: &ChannelGeometry) -> Result<ChannelState, EstimationError> {
        let length = vessel.length.get::<uom::si::length::meter>();
        let breadth = vessel.breadth.get::<uom::si::length::meter>();
        let displacement = vessel.displacement.get::<uom::si::mass::ton>();
        let rho = channel.water_density;
        let total_depth = channel.total_depth().get::<uom::si::length::meter>();
        let width = channel.width.get::<uom::si::length::meter>();
        let bank_slope = channel.inverse_bank_slope;
        let mean_draught = vessel.mean_draught().get::<uom::si::length::meter>();

        // Validate the physical dimensions before dividing by any of them
        if length <= 0.0 || breadth <= 0.0 || mean_draught <= 0.0 || displacement <= 0.0 || rho <= 0.0 || total_depth <= 0.0 || width <= 0.0 {
            return Err(EstimationError::configuration("vessel/channel dimensions", "L, B, Tm, Displ, rho, h0+Dwl and W must all be positive"));
        }
        if vessel.num_propellers == 0 {
            return Err(EstimationError::configuration("num_propellers", "Npro should be greater than 0"));
        }

        let underkeel_clearance = total_depth / mean_draught;
        let block_coefficient = displacement / (length * breadth * mean_draught * rho);
        let effective_width = 7.04 * breadth / block_coefficient.powf(0.85);
        let waterplane_coefficient = match vessel.waterplane_coefficient {
            Some(c_wp) => c_wp,
            None => (1.0 + 2.0 * block_coefficient) / 3.0,
        };
        let midship_coefficient = match vessel.midship_coefficient {
            Some(c_m) => c_m,
            None => 1.006 - 0.0056 * block_coefficient.powf(-3.56),
        };
        let midship_area = midship_coefficient * breadth * mean_draught;

        // hT should be less or equal to h0+Dwl
        let mut trench_height = channel.trench_height.get::<uom::si::length::meter>();
        if total_depth < trench_height {
            log::warn!("Trench height {} m exceeds the total water depth, clamping to {} m", trench_height, total_depth);
            trench_height = total_depth;
        }

        // The channel section depends on whether the banks are close enough to matter
        let section_area: f64;
        if width <= effective_width {
            if !(trench_height > 0.0) {
                return Err(EstimationError::configuration("trench_height", format!("W less than Weff, then hT should be positive and less or equal h0+Dwl: {}", trench_height)));
            }
            if bank_slope < 0.0 {
                return Err(EstimationError::configuration("inverse_bank_slope", format!("Nb should be positive or 0: {}", bank_slope)));
            }
            section_area = (width + bank_slope * total_depth) * total_depth;
        }
        else {
            if trench_height != 0.0 {
                return Err(EstimationError::configuration("trench_height", format!("hT should be 0: {}", trench_height)));
            }
            if bank_slope != 0.0 {
                return Err(EstimationError::configuration("inverse_bank_slope", format!("Nb should be 0: {}", bank_slope)));
            }
            section_area = effective_width * total_depth;
        }

        // Critical speed coefficients for the unrestricted and the restricted channel
        let unrestricted_coefficient = 0.58 * (total_depth * length / breadth / mean_draught).powf(0.125);
        let acos_argument = 1.0 - midship_area / section_area;
        if !(-1.0..=1.0).contains(&acos_argument) {
            return Err(EstimationError::domain("restricted channel coefficient Kc", acos_argument, "arccos argument 1-As/Ach outside [-1,1], the midship section does not fit the channel section"));
        }
        let restricted_coefficient = (2.0 * ((std::f64::consts::PI + acos_argument.acos()) / 3.0).cos()).powf(1.5);

        // Mean water depths
        let mean_depth: f64;
        if width <= effective_width {
            mean_depth = section_area / (width + 2.0 * bank_slope * total_depth);
        }
        else {
            mean_depth = section_area / (effective_width + 2.0 * bank_slope * total_depth);
        }
        let trench_mean_depth = total_depth - trench_height * (1.0 - mean_depth / total_depth);

        // Critical speed, blending the coefficients proportionally to the trench height
        let critical_speed: f64;
        if trench_height == 0.0 {
            critical_speed = unrestricted_coefficient * (GRAVITY * total_depth).sqrt();
        }
        else if trench_height < total_depth {
            critical_speed = (unrestricted_coefficient * (1.0 - trench_height / total_depth) + restricted_coefficient * trench_height / total_depth) * (GRAVITY * trench_mean_depth).sqrt();
        }
        else {
            critical_speed = restricted_coefficient * (GRAVITY * trench_mean_depth).sqrt();
        }
        // Vlim = 0.9*Vcr in parts of the literature, this model uses Vcr
        let limit_speed = critical_speed;

        log::debug!("Derived channel state: C_B = {:.4}, Weff = {:.2} m, Ach = {:.1} m2, Vcr = {:.3} m/s", block_coefficient, effective_width, section_area, critical_speed);

        return Ok(ChannelState {
            mean_draught: uom::si::f64::Length::new::<uom::si::length::meter>(mean_draught),
            total_depth: uom::si::f64::Length::new::<uom::si::length::meter>(total_depth),
            underkeel_clearance,
            block_coefficient,
            waterplane_coefficient,
            midship_coefficient,
            midship_area: uom::si::f64::Area::new::<uom::si::area::square_meter>(midship_area),
            effective_width: uom::si::f64::Length::new::<uom::si::length::meter>(effective_width),
            trench_height: uom::si::f64::Length::new::<uom::si::length::meter>(trench_height),
            section_area: uom::si::f64::Area::new::<uom::si::area::square_meter>(section_area),
            unrestricted_coefficient,
            restricted_coefficient,
            mean_depth: uom::si::f64::Length::new::<uom::si::length::meter>(mean_depth),
            trench_mean_depth: uom::si::f64::Length::new::<uom::si::length::meter>(trench_mean_depth),
            critical_speed: uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(critical_speed),
            limit_speed: uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(limit_speed),
        });
    }

    /// The channel type, re-derived from the clamped trench height on every call
    pub fn channel_type(&self) -> ChannelType {
        let trench_height = self.trench_height.get::<uom::si::length::meter>();
        let total_depth = self.total_depth.get::<uom::si::length::meter>();
        if trench_height == 0.0 {
            return ChannelType::Unrestricted;
        }
        else if trench_height < total_depth {
            return ChannelType::Restricted;
        }
        return ChannelType::Canal;
    }
}

// Squat formulas
//----------------------------------------------------
/// Squat at the bow for an unrestricted channel (Hooft, 1974):
/// Shb = 2*C_B*B*Tm*Fnh^2/(L*sqrt(1-Fnh^2))
/// Forced to 0 for full ships in shallow water (Ukc < 1.2 and C_B >= 0.8) and for any channel with a trench.
/// Returns a DomainError when Fnh >= 1, the formula has no answer at or beyond the depth wave speed.
pub fn squat_hooft(vessel: &VesselGeometry, state: &ChannelState, speed: uom::si::f64::Velocity) -> Result<uom::si::f64::Length, EstimationError> {
    let v = speed.get::<uom::si::velocity::meter_per_second>();
    let total_depth = state.total_depth.get::<uom::si::length::meter>();
    let froude_number = v / (GRAVITY * total_depth).sqrt();

    let bow_squat: f64;
    if state.channel_type() == ChannelType::Unrestricted {
        if froude_number >= 1.0 {
            return Err(EstimationError::domain("Hooft bow squat", froude_number, "depth Froude number must be below 1"));
        }
        let length = vessel.length.get::<uom::si::length::meter>();
        let breadth = vessel.breadth.get::<uom::si::length::meter>();
        let mean_draught = state.mean_draught.get::<uom::si::length::meter>();
        let c_b = state.block_coefficient;
        if state.underkeel_clearance < 1.2 && c_b >= 0.8 {
            bow_squat = 0.0;
        }
        else {
            bow_squat = 2.0 * c_b * breadth * mean_draught * froude_number.powi(2) / length / (1.0 - froude_number.powi(2)).sqrt();
        }
    }
    else {
        bow_squat = 0.0;
    }

    return Ok(uom::si::f64::Length::new::<uom::si::length::meter>(bow_squat));
}

/// Squat at the bow and stern for an unrestricted channel and a canal (Römisch, 1989).
/// Returns (Srb, Srs) where the stern squat is the bow squat divided by the Cf coefficient.
/// Zeroed for the restricted channel, and under the documented shallow/full/slow combinations per branch.
pub fn squat_romisch(vessel: &VesselGeometry, state: &ChannelState, speed: uom::si::f64::Velocity) -> (uom::si::f64::Length, uom::si::f64::Length) {
    let v = speed.get::<uom::si::velocity::meter_per_second>();
    let length = vessel.length.get::<uom::si::length::meter>();
    let breadth = vessel.breadth.get::<uom::si::length::meter>();
    let mean_draught = state.mean_draught.get::<uom::si::length::meter>();
    let total_depth = state.total_depth.get::<uom::si::length::meter>();
    let critical_speed = state.critical_speed.get::<uom::si::velocity::meter_per_second>();
    let c_b = state.block_coefficient;

    let depth_coefficient = 0.155 * (total_depth / mean_draught).sqrt();                          // Kdt
    let bow_coefficient = (10.0 * breadth * c_b / length).powi(2);                                // Cf
    let speed_coefficient = 8.0 * (v / critical_speed).powi(2) * (0.0625 + (v / critical_speed - 0.5).powi(4));  // Cv

    let mut bow_squat: f64;
    match state.channel_type() {
        ChannelType::Unrestricted => {
            bow_squat = speed_coefficient * bow_coefficient * depth_coefficient * mean_draught;
            if state.underkeel_clearance < 1.2 && c_b < 0.8 {
                bow_squat = 0.0;
            }
        }
        ChannelType::Restricted => {
            bow_squat = 0.0;
        }
        ChannelType::Canal => {
            bow_squat = speed_coefficient * bow_coefficient * depth_coefficient * mean_draught;
            let speed_knots = speed.get::<uom::si::velocity::knot>();
            if state.underkeel_clearance < 1.2 && c_b > 0.8 && speed_knots < 7.0 {
                bow_squat = 0.0;
            }
        }
    }
    let stern_squat = bow_squat / bow_coefficient;

    return (uom::si::f64::Length::new::<uom::si::length::meter>(bow_squat), uom::si::f64::Length::new::<uom::si::length::meter>(stern_squat));
}

/// Squat at the bow and stern for a restricted channel and a canal (Ankudinov, 2000).
/// Combines propeller, bulbous bow, transom stern and trim coefficients into a midship sinkage
/// plus a trim correction, split over bow and stern. Returns (Sab, Sas).
/// Zeroed for the unrestricted channel and for a fast full ship in a shallow canal.
pub fn squat_ankudinov(vessel: &VesselGeometry, state: &ChannelState, speed: uom::si::f64::Velocity) -> (uom::si::f64::Length, uom::si::f64::Length) {
    let zero = uom::si::f64::Length::new::<uom::si::length::meter>(0.0);
    // Not applicable without a trench. Returning early also keeps the trim
    // exponential finite, it can overflow for shallow unrestricted channels
    if state.channel_type() == ChannelType::Unrestricted {
        return (zero, zero);
    }

    let v = speed.get::<uom::si::velocity::meter_per_second>();
    let length = vessel.length.get::<uom::si::length::meter>();
    let breadth = vessel.breadth.get::<uom::si::length::meter>();
    let draught_bow = vessel.draught_bow.get::<uom::si::length::meter>();
    let draught_stern = vessel.draught_stern.get::<uom::si::length::meter>();
    let mean_draught = state.mean_draught.get::<uom::si::length::meter>();
    let total_depth = state.total_depth.get::<uom::si::length::meter>();
    let trench_height = state.trench_height.get::<uom::si::length::meter>();
    let midship_area = state.midship_area.get::<uom::si::area::square_meter>();
    let section_area = state.section_area.get::<uom::si::area::square_meter>();
    let ukc = state.underkeel_clearance;
    let c_b = state.block_coefficient;

    // Midship sinkage
    let propeller_bow = if vessel.num_propellers == 1 { 0.15 } else { 0.13 };                     // Kps
    let hull_parameter = 1.7 * c_b * (breadth * mean_draught / length.powi(2)) + 0.004 * c_b.powi(2);  // Phu
    let froude_number = v / (GRAVITY * total_depth).sqrt();
    let froude_parameter = froude_number.powf(1.8 + 0.4 * froude_number);                         // Pfnh
    let depth_parameter = 1.0 + 0.35 / ukc.powi(2);                                               // Pht
    let trench_parameter = c_b * mean_draught * trench_height * midship_area / section_area / total_depth.powi(2);  // Sh
    let channel_bow = 1.0 + 10.0 * trench_parameter - 1.5 * (1.0 + trench_parameter) * trench_parameter.sqrt();    // Pch1
    let midship_sinkage = length * (1.0 + propeller_bow) * hull_parameter * froude_parameter * depth_parameter * channel_bow;

    // Trim correction
    let propeller_stern = if vessel.num_propellers == 1 { 0.15 } else { 0.20 };                   // Kpt
    let bulb_coefficient = if vessel.bulbous_bow { 0.1 } else { 0.0 };                            // Kbt
    let transom_coefficient = if vessel.transom_stern { 0.04 } else { 0.0 };                      // Ktrt
    let initial_trim = (draught_stern - draught_bow) / (draught_stern + draught_bow);             // Kt1t
    let trim_coefficient = c_b.powf(2.0 + 0.8 * channel_bow / c_b) - (0.15 * propeller_bow + propeller_stern) - (bulb_coefficient + transom_coefficient + initial_trim);  // Ktr
    let trim_depth_parameter = 1.0 - (2.5 * (1.0 - ukc) / froude_number).exp();                   // Phtm
    let channel_stern = 1.0 - 5.0 * trench_parameter;                                             // Pch2
    let trim = -1.7 * length * hull_parameter * froude_parameter * trim_depth_parameter * trim_coefficient * channel_stern;

    let mut bow_squat = midship_sinkage - 0.5 * trim;
    let mut stern_squat = midship_sinkage + 0.5 * trim;
    if state.channel_type() == ChannelType::Canal {
        let speed_knots = speed.get::<uom::si::velocity::knot>();
        if ukc < 1.2 && c_b > 0.8 && speed_knots > 7.0 {
            bow_squat = 0.0;
            stern_squat = 0.0;
        }
    }

    return (uom::si::f64::Length::new::<uom::si::length::meter>(bow_squat), uom::si::f64::Length::new::<uom::si::length::meter>(stern_squat));
}

/// Squat for an unrestricted channel, restricted channel or canal.
/// Evaluates all three empirical formulas and selects the governing squat as the maximum of the
/// candidates that apply to the channel type:
/// - unrestricted: max(Shb, Srb, Srs)
/// - restricted: max(Sab, Sas)
/// - canal: max(Sab, Sas, Srb, Srs)
/// # Example:
/// ```no_run
/// use inland_vessel_estimator::*;
///
/// let vessel = VesselGeometry::new(
///     uom::si::f64::Length::new::<uom::si::length::meter>(205.0),
///     uom::si::f64::Length::new::<uom::si::length::meter>(32.0),
///     uom::si::f64::Length::new::<uom::si::length::meter>(10.0),
///     uom::si::f64::Length::new::<uom::si::length::meter>(10.0),
///     uom::si::f64::Mass::new::<uom::si::mass::ton>(37500.0),
///     Some(0.75), Some(0.98), 1, true, true);
/// let channel = ChannelGeometry::new(1.0,
///     uom::si::f64::Length::new::<uom::si::length::meter>(0.0),
///     uom::si::f64::Length::new::<uom::si::length::meter>(30.0),
///     uom::si::f64::Length::new::<uom::si::length::meter>(0.0),
///     uom::si::f64::Length::new::<uom::si::length::meter>(400.0),
///     0.0,
///     uom::si::f64::Length::new::<uom::si::length::meter>(0.2));
/// let state = ChannelState::derive(&vessel, &channel).unwrap();
/// let squat = calculate_squat(&vessel, &state, uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(5.0)).unwrap();
/// println!("{}", squat);
/// ```
pub fn calculate_squat(vessel: &VesselGeometry, state: &ChannelState, speed: uom::si::f64::Velocity) -> Result<SquatResult, EstimationError> {
    let v = speed.get::<uom::si::velocity::meter_per_second>();
    if v <= 0.0 {
        return Err(EstimationError::domain("squat evaluation", v, "speed must be positive"));
    }

    let total_depth = state.total_depth.get::<uom::si::length::meter>();
    let froude_number = v / (GRAVITY * total_depth).sqrt();

    let hooft_bow = squat_hooft(vessel, state, speed)?;
    let (romisch_bow, romisch_stern) = squat_romisch(vessel, state, speed);
    let (ankudinov_bow, ankudinov_stern) = squat_ankudinov(vessel, state, speed);

    // The squat is determined according to the type of channel or canal
    let candidates: Vec<uom::si::f64::Length> = match state.channel_type() {
        ChannelType::Unrestricted => vec![hooft_bow, romisch_bow, romisch_stern],
        ChannelType::Restricted => vec![ankudinov_bow, ankudinov_stern],
        ChannelType::Canal => vec![ankudinov_bow, ankudinov_stern, romisch_bow, romisch_stern],
    };
    let mut governing = candidates[0];
    for candidate in candidates {
        if candidate > governing {
            governing = candidate;
        }
    }

    return Ok(SquatResult {
        froude_number,
        hooft_bow,
        romisch_bow,
        romisch_stern,
        ankudinov_bow,
        ankudinov_stern,
        governing,
    });
}

// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn meters(value: f64) -> uom::si::f64::Length {
        uom::si::f64::Length::new::<uom::si::length::meter>(value)
    }

    fn tons(value: f64) -> uom::si::f64::Mass {
        uom::si::f64::Mass::new::<uom::si::mass::ton>(value)
    }

    fn meters_per_second(value: f64) -> uom::si::f64::Velocity {
        uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(value)
    }

    /// The seagoing cargo vessel in the unrestricted W=400 m, h0=30 m channel
    fn cargo_vessel() -> (VesselGeometry, ChannelGeometry) {
        let vessel = VesselGeometry::new(meters(205.0), meters(32.0), meters(10.0), meters(10.0), tons(37500.0), Some(0.75), Some(0.98), 1, true, true);
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(30.0), meters(0.0), meters(400.0), 0.0, meters(0.2));
        (vessel, channel)
    }

    /// The M6 motorvessel, C_WP and C_M left for the estimator to derive
    fn motorvessel() -> (VesselGeometry, ChannelGeometry) {
        let vessel = VesselGeometry::new(meters(85.0), meters(9.5), meters(2.0), meters(2.0), tons(1373.0), None, None, 2, false, false);
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(0.0), meters(150.0), 0.0, meters(0.2));
        (vessel, channel)
    }

    /// The motorvessel moved into a canal cross-section with sloped banks
    fn motorvessel_canal() -> (VesselGeometry, ChannelGeometry) {
        let (vessel, _) = motorvessel();
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(3.0), meters(50.0), 2.0, meters(0.2));
        (vessel, channel)
    }

    #[test]
    fn cargo_vessel_channel_state_test() {
        let (vessel, channel) = cargo_vessel();
        let state = ChannelState::derive(&vessel, &channel).unwrap();

        // C_B = 37500/(205*32*10*1.0), Weff = 7.04*32/C_B^0.85
        assert_relative_eq!(state.block_coefficient, 0.571646, epsilon = 1e-5);
        assert_relative_eq!(state.effective_width.get::<uom::si::length::meter>(), 362.4, epsilon = 0.5);
        // Weff < W so the channel is unrestricted and Ach = Weff*(h0+Dwl)
        assert!(state.effective_width < channel.width);
        assert_eq!(state.channel_type(), ChannelType::Unrestricted);
        assert_relative_eq!(state.section_area.get::<uom::si::area::square_meter>(), state.effective_width.get::<uom::si::length::meter>() * 30.0, epsilon = 1e-9);
        // The given coefficients are used as given
        assert_eq!(state.waterplane_coefficient, 0.75);
        assert_eq!(state.midship_coefficient, 0.98);
        assert_relative_eq!(state.underkeel_clearance, 3.0, epsilon = 1e-12);
        // Vcr = Kch*sqrt(9.81*30) with Kch = 0.58*(30*205/32/10)^0.125
        assert_relative_eq!(state.critical_speed.get::<uom::si::velocity::meter_per_second>(), 14.40, epsilon = 0.01);
        assert!(state.limit_speed.get::<uom::si::velocity::meter_per_second>() > 0.0);
        assert!(state.effective_width.get::<uom::si::length::meter>() > 0.0);
    }

    #[test]
    fn motorvessel_derived_coefficients_test() {
        let (vessel, channel) = motorvessel();
        let state = ChannelState::derive(&vessel, &channel).unwrap();

        // C_B = 1373/(85*9.5*2*1.0) = 0.8502
        assert_relative_eq!(state.block_coefficient, 0.850155, epsilon = 1e-5);
        // C_WP and C_M come from the documented regressions
        assert_relative_eq!(state.waterplane_coefficient, (1.0 + 2.0 * state.block_coefficient) / 3.0, epsilon = 1e-12);
        assert_relative_eq!(state.midship_coefficient, 1.006 - 0.0056 * state.block_coefficient.powf(-3.56), epsilon = 1e-12);
        assert_relative_eq!(state.effective_width.get::<uom::si::length::meter>(), 76.8, epsilon = 0.1);
        assert_eq!(state.channel_type(), ChannelType::Unrestricted);
    }

    #[test]
    fn derive_is_idempotent_test() {
        let (vessel, channel) = cargo_vessel();
        let first = ChannelState::derive(&vessel, &channel).unwrap();
        let second = ChannelState::derive(&vessel, &channel).unwrap();
        // Bit identical, the derivation has no hidden state
        assert_eq!(first, second);
    }

    #[test]
    fn channel_type_consistency_test() {
        let (vessel, _) = motorvessel();
        // hT = 0 -> unrestricted, 0 < hT < h0+Dwl -> restricted, hT = h0+Dwl -> canal
        let unrestricted = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(0.0), meters(150.0), 0.0, meters(0.2));
        let restricted = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(1.5), meters(50.0), 2.0, meters(0.2));
        let canal = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(3.0), meters(50.0), 2.0, meters(0.2));

        assert_eq!(ChannelState::derive(&vessel, &unrestricted).unwrap().channel_type(), ChannelType::Unrestricted);
        assert_eq!(ChannelState::derive(&vessel, &restricted).unwrap().channel_type(), ChannelType::Restricted);
        assert_eq!(ChannelState::derive(&vessel, &canal).unwrap().channel_type(), ChannelType::Canal);
    }

    #[test]
    fn trench_height_clamp_test() {
        // The clamp logs a warning, route it through the test logger
        let _ = env_logger::builder().is_test(true).try_init();
        let (vessel, _) = motorvessel();
        // hT above h0+Dwl is clamped down, which lands the channel in the canal case
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(5.0), meters(50.0), 2.0, meters(0.2));
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        assert_eq!(state.trench_height.get::<uom::si::length::meter>(), 3.0);
        assert_eq!(state.channel_type(), ChannelType::Canal);
    }

    #[test]
    fn narrow_channel_without_trench_is_rejected_test() {
        let (vessel, _) = motorvessel();
        // W = 50 < Weff = 76.8 but hT = 0, contradictory configuration
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(0.0), meters(50.0), 2.0, meters(0.2));
        match ChannelState::derive(&vessel, &channel) {
            Err(EstimationError::Configuration { field, .. }) => assert_eq!(field, "trench_height"),
            other => panic!("Expected a configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn wide_channel_with_trench_is_rejected_test() {
        let (vessel, _) = motorvessel();
        // W = 150 > Weff but hT > 0, contradictory configuration
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(1.0), meters(150.0), 0.0, meters(0.2));
        assert!(matches!(ChannelState::derive(&vessel, &channel), Err(EstimationError::Configuration { .. })));
        // Same for a bank slope without a trench
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(0.0), meters(150.0), 2.0, meters(0.2));
        assert!(matches!(ChannelState::derive(&vessel, &channel), Err(EstimationError::Configuration { .. })));
    }

    #[test]
    fn zero_propellers_is_rejected_test() {
        let (mut vessel, channel) = motorvessel();
        vessel.num_propellers = 0;
        assert!(matches!(ChannelState::derive(&vessel, &channel), Err(EstimationError::Configuration { .. })));
    }

    #[test]
    fn midship_section_larger_than_channel_section_test() {
        // A canal section far smaller than the midship section pushes 1-As/Ach below -1
        let vessel = VesselGeometry::new(meters(85.0), meters(9.5), meters(2.0), meters(2.0), tons(1373.0), None, None, 2, false, false);
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(1.0), meters(1.0), meters(5.0), 0.0, meters(0.2));
        match ChannelState::derive(&vessel, &channel) {
            Err(EstimationError::Domain { value, .. }) => assert!(value < -1.0),
            other => panic!("Expected a domain error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn cargo_vessel_squat_test() {
        let (vessel, channel) = cargo_vessel();
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        let squat = calculate_squat(&vessel, &state, meters_per_second(5.0)).unwrap();

        assert_relative_eq!(squat.froude_number, 5.0 / (9.81f64 * 30.0).sqrt(), epsilon = 1e-12);
        // Hand evaluated candidates at 5 m/s
        assert_relative_eq!(squat.hooft_bow.get::<uom::si::length::meter>(), 0.1585, epsilon = 1e-3);
        assert_relative_eq!(squat.romisch_bow.get::<uom::si::length::meter>(), 0.1300, epsilon = 2e-3);
        assert_relative_eq!(squat.romisch_stern.get::<uom::si::length::meter>(), 0.1633, epsilon = 2e-3);
        // Ankudinov does not apply without a trench
        assert_eq!(squat.ankudinov_bow.get::<uom::si::length::meter>(), 0.0);
        assert_eq!(squat.ankudinov_stern.get::<uom::si::length::meter>(), 0.0);
        // The governing squat is the Römisch stern value here
        assert_eq!(squat.governing, squat.romisch_stern);
    }

    #[test]
    fn canal_squat_evaluates_all_candidates_test() {
        let (vessel, channel) = motorvessel_canal();
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        let squat = calculate_squat(&vessel, &state, meters_per_second(2.0)).unwrap();

        // All four canal candidates must be finite numbers
        assert!(squat.ankudinov_bow.get::<uom::si::length::meter>().is_finite());
        assert!(squat.ankudinov_stern.get::<uom::si::length::meter>().is_finite());
        assert!(squat.romisch_bow.get::<uom::si::length::meter>().is_finite());
        assert!(squat.romisch_stern.get::<uom::si::length::meter>().is_finite());
        // Hand evaluated values at 2 m/s
        assert_relative_eq!(squat.ankudinov_bow.get::<uom::si::length::meter>(), 0.1488, epsilon = 2e-3);
        assert_relative_eq!(squat.ankudinov_stern.get::<uom::si::length::meter>(), 0.1142, epsilon = 2e-3);
        assert_relative_eq!(squat.romisch_bow.get::<uom::si::length::meter>(), 0.0720, epsilon = 2e-3);
        // With twin screws and no bow-heavy trim the bow squat governs
        assert_eq!(squat.governing, squat.ankudinov_bow);
    }

    #[test]
    fn restricted_channel_uses_ankudinov_only_test() {
        let (vessel, _) = motorvessel();
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(1.5), meters(50.0), 2.0, meters(0.2));
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        let squat = calculate_squat(&vessel, &state, meters_per_second(2.0)).unwrap();

        // Hooft and Römisch are zeroed in the restricted channel
        assert_eq!(squat.hooft_bow.get::<uom::si::length::meter>(), 0.0);
        assert_eq!(squat.romisch_bow.get::<uom::si::length::meter>(), 0.0);
        assert_eq!(squat.romisch_stern.get::<uom::si::length::meter>(), 0.0);
        assert!(squat.ankudinov_bow.get::<uom::si::length::meter>() > 0.0 || squat.ankudinov_stern.get::<uom::si::length::meter>() > 0.0);
        assert!(squat.governing.get::<uom::si::length::meter>() >= 0.0);
    }

    #[test]
    fn hooft_squat_is_monotonic_in_speed_test() {
        let (vessel, channel) = cargo_vessel();
        let state = ChannelState::derive(&vessel, &channel).unwrap();

        // Below Fnh = 1 the governing unrestricted squat never decreases with speed
        let mut last = -1.0;
        for i in 1..=100 {
            let v = state.limit_speed.get::<uom::si::velocity::meter_per_second>() * (i as f64) / 100.0;
            let squat = calculate_squat(&vessel, &state, meters_per_second(v)).unwrap();
            let governing = squat.governing.get::<uom::si::length::meter>();
            assert!(governing >= last, "squat decreased from {} to {} at v = {}", last, governing, v);
            last = governing;
        }
    }

    #[test]
    fn froude_number_at_or_above_one_is_a_domain_error_test() {
        let (vessel, channel) = cargo_vessel();
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        // sqrt(9.81*30) = 17.16 m/s is the depth wave speed
        let result = calculate_squat(&vessel, &state, meters_per_second(18.0));
        assert!(matches!(result, Err(EstimationError::Domain { .. })));
    }

    #[test]
    fn non_positive_speed_is_a_domain_error_test() {
        let (vessel, channel) = cargo_vessel();
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        assert!(matches!(calculate_squat(&vessel, &state, meters_per_second(0.0)), Err(EstimationError::Domain { .. })));
        assert!(matches!(calculate_squat(&vessel, &state, meters_per_second(-1.0)), Err(EstimationError::Domain { .. })));
    }
}

/// Everything estimator related for the inland vessel estimator, the grounding speed search and the speed/power/emission profile sweep.
/// Author: G0rocks
/// Date: 2025-07-02

use crate::*;   // To use everything from the crate

// Structs and Enums
//----------------------------------------------------
/// Struct to hold the sampling setup of the grounding speed search
#[derive(Debug)]
pub struct GroundingSearchConfig {
    /// Upper bound of the sampled speed range
    pub max_speed: uom::si::f64::Velocity,
    /// Number of sampled speeds over (0, max_speed]. More samples give a finer grounding speed at linear cost
    pub samples: usize,
}

impl GroundingSearchConfig {
    /// Creates a new GroundingSearchConfig with the given parameters
    pub fn new(max_speed: uom::si::f64::Velocity, samples: usize) -> Self {
        GroundingSearchConfig {
            max_speed,
            samples,
        }
    }
}

impl Default for GroundingSearchConfig {
    /// The reference setup, 1000 samples up to 20 m/s
    fn default() -> Self {
        GroundingSearchConfig::new(uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(20.0), 1000)
    }
}

/// How the grounding speed scan ended
#[derive(Debug, Clone, Copy)]
pub enum GroundingOutcome {
    /// The underkeel clearance was exhausted before the limit speed.
    /// Holds the first sampled speed at which clearance minus squat minus safety margin went negative
    Grounded {
        speed: uom::si::f64::Velocity,
        squat: uom::si::f64::Length,
    },
    /// The scan passed the limit speed with clearance to spare, the limit speed is the effective ceiling.
    /// Holds the first sampled speed beyond the limit speed (or the last sample if the range ran out)
    LimitSpeedBound {
        speed: uom::si::f64::Velocity,
        squat: uom::si::f64::Length,
    },
}

impl GroundingOutcome {
    /// The speed at which the scan stopped
    pub fn speed(&self) -> uom::si::f64::Velocity {
        match self {
            GroundingOutcome::Grounded { speed, .. } => *speed,
            GroundingOutcome::LimitSpeedBound { speed, .. } => *speed,
        }
    }

    /// The governing squat at the stopping speed
    pub fn squat(&self) -> uom::si::f64::Length {
        match self {
            GroundingOutcome::Grounded { squat, .. } => *squat,
            GroundingOutcome::LimitSpeedBound { squat, .. } => *squat,
        }
    }
}

/// Struct to hold the full speed profile of one scenario, one entry per sampled speed.
/// All vectors have the same length
#[derive(Debug)]
pub struct SpeedProfile {
    /// Sampled speeds
    pub speeds: Vec<uom::si::f64::Velocity>,
    /// Governing squat per speed
    pub squat: Vec<uom::si::f64::Length>,
    /// Water depth left under way, (h0+Dwl) minus the squat
    pub effective_depth: Vec<uom::si::f64::Length>,
    /// Total hull resistance per speed
    pub resistance: Vec<uom::si::f64::Force>,
    /// Power required at the propellers per speed
    pub propulsion_power: Vec<uom::si::f64::Power>,
    /// Total power required per speed
    pub total_power: Vec<uom::si::f64::Power>,
    /// Actual total power installed
    pub installed_power: Vec<uom::si::f64::Power>,
    /// Specific fuel consumption per speed in [g/kWh]
    pub specific_fuel_consumption: Vec<f64>,
    /// Fuel use per speed in [kg/h]
    pub fuel_rate: Vec<f64>,
    /// CO2 emitted per speed in [kg/h]
    pub co2_rate: Vec<f64>,
    /// NOx emitted per speed in [kg/h]
    pub nox_rate: Vec<f64>,
    /// PM10 emitted per speed in [kg/h]
    pub pm10_rate: Vec<f64>,
}

// Estimators
//----------------------------------------------------
/// Finds the grounding speed, the highest speed at which the underkeel clearance at rest still covers
/// the squat plus the safety margin, by a linear forward scan over the sampled speed range.
///
/// At each sampled speed v the scan computes the governing squat and the remaining clearance
/// diff = z_given - squat - safety_margin with z_given = (h0+Dwl) - Tm, and keeps walking while
/// diff >= 0 and v <= Vlim. The reported speed is the first sample that violates either condition,
/// so the granularity of the answer is the sampling resolution.
///
/// If the very first sample already violates the clearance the scan reports it as the grounding
/// speed, a valid if degenerate result. If the sampled range runs out before either condition
/// trips, the scan reports the last sample as limit-speed-bound.
pub fn find_grounding_speed(vessel: &VesselGeometry, channel: &ChannelGeometry, state: &ChannelState, config: &GroundingSearchConfig) -> Result<GroundingOutcome, EstimationError> {
    let samples = config.samples;
    if samples < 2 {
        return Err(EstimationError::configuration("samples", "the scan needs at least 2 sampled speeds"));
    }
    let max_speed = config.max_speed.get::<uom::si::velocity::meter_per_second>();
    if max_speed <= 0.01 {
        return Err(EstimationError::configuration("max_speed", "the sampled speed range must reach beyond 0.01 m/s"));
    }

    let limit_speed = state.limit_speed.get::<uom::si::velocity::meter_per_second>();
    let total_depth = state.total_depth.get::<uom::si::length::meter>();
    let mean_draught = state.mean_draught.get::<uom::si::length::meter>();
    let safety_margin = channel.safety_margin.get::<uom::si::length::meter>();
    // Available underkeel clearance with the vessel at rest
    let clearance_at_rest = total_depth - mean_draught;

    let step = (max_speed - 0.01) / ((samples - 1) as f64);
    let mut index = 0;
    let mut v = 0.01;
    let mut squat = calculate_squat(vessel, state, uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(v))?.governing;
    let mut diff = clearance_at_rest - squat.get::<uom::si::length::meter>() - safety_margin;

    while diff >= 0.0 && v <= limit_speed {
        // Range exhausted without a violation, the limit speed was never reached within the samples
        if index + 1 >= samples {
            return Ok(GroundingOutcome::LimitSpeedBound {
                speed: uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(v),
                squat,
            });
        }
        index += 1;
        v = 0.01 + step * (index as f64);
        squat = calculate_squat(vessel, state, uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(v))?.governing;
        diff = clearance_at_rest - squat.get::<uom::si::length::meter>() - safety_margin;
    }

    // The first violating sample. Beyond the limit speed it is not a grounding speed
    let speed = uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(v);
    if v > limit_speed {
        return Ok(GroundingOutcome::LimitSpeedBound { speed, squat });
    }
    return Ok(GroundingOutcome::Grounded { speed, squat });
}

/// Estimates the full speed profile of the scenario: squat, effective depth, total resistance,
/// power required and fuel/emission rates for every sampled speed up to the lower of the limit
/// speed and the grounding speed.
///
/// The propulsion and emission model is a passed-in capability, the sweep only uses the
/// [PropulsionModel] and [EmissionModel] calls and treats the model as opaque.
pub fn estimate_speed_profile<M: PropulsionModel + EmissionModel>(vessel: &VesselGeometry, channel: &ChannelGeometry, state: &ChannelState, engine: &M, config: &GroundingSearchConfig) -> Result<SpeedProfile, EstimationError> {
    let outcome = find_grounding_speed(vessel, channel, state, config)?;

    // The profile only makes sense up to the lower of the limit speed and the grounding speed
    let limit_speed = state.limit_speed.get::<uom::si::velocity::meter_per_second>();
    let max_speed = limit_speed.min(outcome.speed().get::<uom::si::velocity::meter_per_second>());
    let samples = config.samples;
    let step = (max_speed - 0.01) / ((samples - 1) as f64);

    let mut profile = SpeedProfile {
        speeds: Vec::with_capacity(samples),
        squat: Vec::with_capacity(samples),
        effective_depth: Vec::with_capacity(samples),
        resistance: Vec::with_capacity(samples),
        propulsion_power: Vec::with_capacity(samples),
        total_power: Vec::with_capacity(samples),
        installed_power: Vec::with_capacity(samples),
        specific_fuel_consumption: Vec::with_capacity(samples),
        fuel_rate: Vec::with_capacity(samples),
        co2_rate: Vec::with_capacity(samples),
        nox_rate: Vec::with_capacity(samples),
        pm10_rate: Vec::with_capacity(samples),
    };

    for index in 0..samples {
        let v = 0.01 + step * (index as f64);
        let speed = uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(v);

        let squat = calculate_squat(vessel, state, speed)?.governing;
        let effective_depth = state.total_depth - squat;
        let resistance = engine.total_resistance(speed, effective_depth)?;
        let power = engine.total_power_required(speed, effective_depth)?;
        let specific_fuel_consumption = engine.specific_fuel_consumption(speed, effective_depth)?;
        let factors = engine.emission_factors(speed, effective_depth)?;

        let total_kilowatts = power.total.get::<uom::si::power::kilowatt>();
        profile.speeds.push(speed);
        profile.squat.push(squat);
        profile.effective_depth.push(effective_depth);
        profile.resistance.push(resistance);
        profile.propulsion_power.push(power.propulsion);
        profile.total_power.push(power.total);
        profile.installed_power.push(power.installed);
        profile.specific_fuel_consumption.push(specific_fuel_consumption);
        profile.fuel_rate.push(specific_fuel_consumption * total_kilowatts / 1000.0);
        profile.co2_rate.push(factors.co2 * total_kilowatts / 1000.0);
        profile.nox_rate.push(factors.nox * total_kilowatts / 1000.0);
        profile.pm10_rate.push(factors.pm10 * total_kilowatts / 1000.0);
    }

    return Ok(profile);
}

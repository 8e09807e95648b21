/// Everything propulsion and emission related for the inland vessel estimator. The squat core only talks to this module through the PropulsionModel and EmissionModel traits so other resistance models can be plugged in.
/// Author: G0rocks
/// Date: 2025-06-24

use crate::*;   // To use everything from the crate

// Constants
//----------------------------------------------------
/// Grams of CO2 emitted per gram of diesel fuel burned
pub const CO2_PER_GRAM_FUEL: f64 = 3.206;

// Traits
//----------------------------------------------------
/// Trait for anything that can estimate the hull resistance and the power needed to push the vessel through the water.
/// The grounding and profile estimators only use these two calls, how the numbers are produced is up to the implementor.
pub trait PropulsionModel {
    /// Total hull resistance at the given speed and effective water depth (total depth minus squat)
    fn total_resistance(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<uom::si::f64::Force, EstimationError>;

    /// Power required at the given speed and effective water depth
    fn total_power_required(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<PowerRequirement, EstimationError>;
}

/// Trait for anything that can estimate fuel use and exhaust emissions of the engine
pub trait EmissionModel {
    /// Specific fuel consumption in [g/kWh] at the given speed and effective water depth
    fn specific_fuel_consumption(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<f64, EstimationError>;

    /// CO2, NOx and PM10 emission factors in [g/kWh] at the given speed and effective water depth
    fn emission_factors(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<EmissionFactors, EstimationError>;
}

// Structs and Enums
//----------------------------------------------------
/// The three power figures returned by a propulsion model for one speed
#[derive(Debug, Clone, Copy)]
pub struct PowerRequirement {
    /// Power required at the propellers
    pub propulsion: uom::si::f64::Power,
    /// Propulsion power plus the hotel power for the systems on board
    pub total: uom::si::f64::Power,
    /// Actual total power installed
    pub installed: uom::si::f64::Power,
}

/// Emission factors in [g/kWh] for one speed
#[derive(Debug, Clone, Copy)]
pub struct EmissionFactors {
    /// Carbon dioxide [g/kWh]
    pub co2: f64,
    /// Nitrogen oxides [g/kWh]
    pub nox: f64,
    /// Particulate matter [g/kWh]
    pub pm10: f64,
}

/// Weight class of the ship depending on carrying capacity
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WeightClass {
    L1,
    L2,
    L3,
}

/// Type of vessel, selects the hull efficiency used in the propulsion power calculation
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VesselClass {
    /// Riverboat
    Inland,
    /// Tankers and bulkcarriers
    Tanker,
    /// Containerships
    Container,
    /// RoRo ships
    RoRo,
}

impl VesselClass {
    /// Wake fraction w and thrust deduction t, textbook values per vessel type
    pub fn wake_and_thrust(&self) -> (f64, f64) {
        match self {
            VesselClass::Inland => (0.25, 0.20),
            VesselClass::Tanker => (0.35, 0.25),
            VesselClass::Container => (0.30, 0.22),
            VesselClass::RoRo => (0.28, 0.22),
        }
    }

    /// Hull efficiency (1-t)/(1-w)
    pub fn hull_efficiency(&self) -> f64 {
        let (wake, thrust) = self.wake_and_thrust();
        return (1.0 - thrust) / (1.0 - wake);
    }
}

/// Struct to hold the engine and propulsion parameters.
/// Most fields carry the documented default value, only the installed power, the weight class and the construction year must always be given.
pub struct EngineParameters {
    /// Installed engine power
    pub installed_power: uom::si::f64::Power,
    /// Weight class of the ship (depending on carrying capacity)
    pub weight_class: WeightClass,
    /// Construction year of the engine
    pub construction_year: i32,
    /// Power for systems on board. If None, calculated from the hotel power fraction
    pub hotel_power: Option<uom::si::f64::Power>,
    /// Fraction of the installed power used as hotel power when no hotel power is given [-]
    pub hotel_power_fraction: f64,
    /// Kinematic viscosity of the water in [m^2/s]
    pub kinematic_viscosity: f64,
    /// Open water efficiency of the propeller [-]
    pub eta_open_water: f64,
    /// Relative rotative efficiency [-]
    pub eta_relative_rotative: f64,
    /// Transmission efficiency [-]
    pub eta_transmission: f64,
    /// Gearing efficiency [-]
    pub eta_gearing: f64,
    /// Shape of the afterbody [-]
    pub c_stern: f64,
    /// Breadth coefficient of the bulbous bow after Kracht (1970) [-]
    pub bulb_breadth_coefficient: f64,
    /// Appendage resistance factor (1+k2) [-]
    pub appendage_factor: f64,
    /// Type of vessel for the propulsion power calculation
    pub vessel_class: VesselClass,
    /// Wetted area of the appendages as a fraction of the hull wetted area [-]
    pub appendage_area_fraction: f64,
    /// Position of the centre of the bulb transverse area as a fraction of the mean draught [-]
    pub bulb_center_fraction: f64,
    /// Transverse area of the transom as a fraction of B*Tm [-]
    pub transom_area_fraction: f64,
    /// Propeller diameter. If None, calculated as 0.7*Tm
    pub propeller_diameter: Option<uom::si::f64::Length>,
}

impl EngineParameters {
    /// Creates engine parameters with the documented default values for everything that is not required
    pub fn new(installed_power: uom::si::f64::Power, weight_class: WeightClass, construction_year: i32) -> EngineParameters {
        EngineParameters {
            installed_power,
            weight_class,
            construction_year,
            hotel_power: None,
            hotel_power_fraction: 0.05,
            kinematic_viscosity: 1e-6,
            eta_open_water: 0.4,
            eta_relative_rotative: 1.0,
            eta_transmission: 0.98,
            eta_gearing: 0.96,
            c_stern: 0.0,
            bulb_breadth_coefficient: 0.2,
            appendage_factor: 2.5,
            vessel_class: VesselClass::Inland,
            appendage_area_fraction: 0.05,
            bulb_center_fraction: 0.2,
            transom_area_fraction: 0.2,
            propeller_diameter: None,
        }
    }
}

/// The bundled Holtrop & Mennen style resistance and power model.
/// Captures the resolved hull values at construction so the per speed calls only do arithmetic.
pub struct InlandEngineModel {
    /// Vessel length between perpendiculars in [m]
    pub length: f64,
    /// Vessel width in [m]
    pub breadth: f64,
    /// Mean draught in [m]
    pub mean_draught: f64,
    /// Bow draught in [m]
    pub draught_bow: f64,
    /// Block coefficient [-]
    pub block_coefficient: f64,
    /// Midship section coefficient [-]
    pub midship_coefficient: f64,
    /// Waterplane coefficient [-]
    pub waterplane_coefficient: f64,
    /// Prismatic coefficient C_P = C_B/C_M [-]
    pub prismatic_coefficient: f64,
    /// Displacement volume in [m^3]
    pub displacement_volume: f64,
    /// Midship section area in [m^2]
    pub midship_area: f64,
    /// Water density in [t/m^3]
    pub water_density: f64,
    /// Wetted surface of the hull in [m^2], Holtrop regression
    pub wetted_surface: f64,
    /// Transverse area of the bulbous bow in [m^2], 0 without a bulbous bow
    pub bulb_area: f64,
    /// Height of the centre of the bulb area above the keel in [m]
    pub bulb_center: f64,
    /// Immersed transom area in [m^2], 0 without a transom stern
    pub transom_area: f64,
    /// Wetted area of the appendages in [m^2]
    pub appendage_area: f64,
    /// Hull efficiency (1-t)/(1-w) [-]
    pub hull_efficiency: f64,
    /// Hotel power in [kW], given or derived from the hotel power fraction
    pub hotel_power: f64,
    /// Propeller diameter in [m], given or derived as 0.7*Tm
    pub propeller_diameter: f64,
    /// The engine parameters as given
    pub parameters: EngineParameters,
}

// Implementation of the InlandEngineModel struct
//----------------------------------------------------
impl InlandEngineModel {
    /// Creates a new InlandEngineModel for one vessel/channel scenario.
    /// The hull values are resolved once from the vessel geometry and the derived channel state,
    /// optional engine parameters get their documented defaults filled in here and are never recomputed.
    pub fn new(vessel: &VesselGeometry, channel: &ChannelGeometry, state: &ChannelState, parameters: EngineParameters) -> Result<InlandEngineModel, EstimationError> {
        let installed = parameters.installed_power.get::<uom::si::power::kilowatt>();
        if installed <= 0.0 {
            return Err(EstimationError::configuration("installed_power", "P_installed must be positive"));
        }
        for (name, eta) in [("eta_open_water", parameters.eta_open_water), ("eta_relative_rotative", parameters.eta_relative_rotative), ("eta_transmission", parameters.eta_transmission), ("eta_gearing", parameters.eta_gearing)] {
            if eta <= 0.0 || eta > 1.0 {
                return Err(EstimationError::configuration("efficiency", format!("{} must lie in (0,1]: {}", name, eta)));
            }
        }
        if parameters.kinematic_viscosity <= 0.0 {
            return Err(EstimationError::configuration("kinematic_viscosity", "nu must be positive"));
        }

        let length = vessel.length.get::<uom::si::length::meter>();
        let breadth = vessel.breadth.get::<uom::si::length::meter>();
        let mean_draught = state.mean_draught.get::<uom::si::length::meter>();
        let draught_bow = vessel.draught_bow.get::<uom::si::length::meter>();
        let c_b = state.block_coefficient;
        let c_m = state.midship_coefficient;
        let c_wp = state.waterplane_coefficient;
        let displacement_volume = vessel.displacement.get::<uom::si::mass::ton>() / channel.water_density;

        // Bulb, transom and appendage geometry from the documented fractions
        let bulb_area = if vessel.bulbous_bow { parameters.bulb_breadth_coefficient * breadth * mean_draught } else { 0.0 };
        let bulb_center = parameters.bulb_center_fraction * mean_draught;
        let transom_area = if vessel.transom_stern { parameters.transom_area_fraction * breadth * mean_draught } else { 0.0 };

        // Wetted surface by the Holtrop regression
        let wetted_surface = length * (2.0 * mean_draught + breadth) * c_m.sqrt()
            * (0.453 + 0.4425 * c_b - 0.2862 * c_m - 0.003467 * breadth / mean_draught + 0.3696 * c_wp)
            + 2.38 * bulb_area / c_b;
        let appendage_area = parameters.appendage_area_fraction * wetted_surface;

        let hotel_power = match parameters.hotel_power {
            Some(power) => power.get::<uom::si::power::kilowatt>(),
            None => parameters.hotel_power_fraction * installed,
        };
        let propeller_diameter = match parameters.propeller_diameter {
            Some(diameter) => diameter.get::<uom::si::length::meter>(),
            None => 0.7 * mean_draught,
        };

        return Ok(InlandEngineModel {
            length,
            breadth,
            mean_draught,
            draught_bow,
            block_coefficient: c_b,
            midship_coefficient: c_m,
            waterplane_coefficient: c_wp,
            prismatic_coefficient: c_b / c_m,
            displacement_volume,
            midship_area: state.midship_area.get::<uom::si::area::square_meter>(),
            water_density: channel.water_density,
            wetted_surface,
            bulb_area,
            bulb_center,
            transom_area,
            appendage_area,
            hull_efficiency: parameters.vessel_class.hull_efficiency(),
            hotel_power,
            propeller_diameter,
            parameters,
        });
    }

    /// Effective through-water speed in shallow water after Lackenby:
    /// dV/V = 0.1242*(Am/h^2 - 0.05) + 1 - sqrt(tanh(g*h/v^2)), applied for Am/h^2 > 0.05
    fn shallow_water_speed(&self, v: f64, effective_depth: f64) -> Result<f64, EstimationError> {
        let depth_ratio = self.midship_area / effective_depth.powi(2);
        if depth_ratio <= 0.05 {
            return Ok(v);
        }
        let speed_loss = 0.1242 * (depth_ratio - 0.05) + 1.0 - (GRAVITY * effective_depth / v.powi(2)).tanh().sqrt();
        if speed_loss >= 1.0 {
            return Err(EstimationError::domain("shallow water correction", speed_loss, "effective depth too small for the vessel at this speed"));
        }
        return Ok(v / (1.0 - speed_loss));
    }

    /// Form factor (1+k1) of the hull by the Holtrop regression, lcb assumed amidships
    fn form_factor(&self) -> f64 {
        let c14 = 1.0 + 0.011 * self.parameters.c_stern;
        let c_p = self.prismatic_coefficient;
        let run_length = self.length * (1.0 - c_p);
        return 0.93 + 0.487118 * c14
            * (self.breadth / self.length).powf(1.06806)
            * (self.mean_draught / self.length).powf(0.46106)
            * (self.length / run_length).powf(0.121563)
            * (self.length.powi(3) / self.displacement_volume).powf(0.36486)
            * (1.0 - c_p).powf(-0.604247);
    }

    /// Wave resistance in [N] by the Holtrop & Mennen regression
    fn wave_resistance(&self, v: f64, rho: f64) -> f64 {
        let froude_number = v / (GRAVITY * self.length).sqrt();
        // The regression vanishes for very low Froude numbers and its cos(lambda*Fn^-2) term
        // is not evaluable there, so cut off early
        if froude_number < 0.05 {
            return 0.0;
        }

        let c_p = self.prismatic_coefficient;
        let beam_ratio = self.breadth / self.length;
        let c7 = if beam_ratio < 0.11 {
            0.229577 * beam_ratio.powf(1.0 / 3.0)
        } else if beam_ratio <= 0.25 {
            beam_ratio
        } else {
            0.5 - 0.0625 * self.length / self.breadth
        };
        let run_length = self.length * (1.0 - c_p);
        let half_entrance_angle = 1.0 + 89.0 * (-(self.length / self.breadth).powf(0.80856)
            * (1.0 - self.waterplane_coefficient).powf(0.30484)
            * (1.0 - c_p).powf(0.6367)
            * (run_length / self.breadth).powf(0.34574)
            * (100.0 * self.displacement_volume / self.length.powi(3)).powf(0.16302)).exp();
        let c1 = 2223105.0 * c7.powf(3.78613) * (self.mean_draught / self.breadth).powf(1.07961) * (90.0 - half_entrance_angle).powf(-1.37565);
        let c3 = if self.bulb_area > 0.0 {
            0.56 * self.bulb_area.powf(1.5) / (self.breadth * self.mean_draught * (0.31 * self.bulb_area.sqrt() + self.draught_bow - self.bulb_center))
        } else {
            0.0
        };
        let c2 = (-1.89 * c3.sqrt()).exp();
        let c5 = 1.0 - 0.8 * self.transom_area / (self.breadth * self.mean_draught * self.midship_coefficient);
        let lambda = if self.length / self.breadth < 12.0 {
            1.446 * c_p - 0.03 * self.length / self.breadth
        } else {
            1.446 * c_p - 0.36
        };
        let c16 = if c_p < 0.8 {
            8.07981 * c_p - 13.8673 * c_p.powi(2) + 6.984388 * c_p.powi(3)
        } else {
            1.73014 - 0.7067 * c_p
        };
        let m1 = 0.0140407 * self.length / self.mean_draught - 1.75254 * self.displacement_volume.powf(1.0 / 3.0) / self.length - 4.79323 * self.breadth / self.length - c16;
        let slenderness = self.length.powi(3) / self.displacement_volume;
        let c15 = if slenderness < 512.0 {
            -1.69385
        } else if slenderness > 1726.91 {
            0.0
        } else {
            -1.69385 + (self.length / self.displacement_volume.powf(1.0 / 3.0) - 8.0) / 2.36
        };
        let m4 = c15 * 0.4 * (-0.034 * froude_number.powf(-3.29)).exp();

        return c1 * c2 * c5 * self.displacement_volume * rho * GRAVITY
            * (m1 * froude_number.powf(-0.9) + m4 * (lambda * froude_number.powf(-2.0)).cos()).exp();
    }

    /// Additional resistance of the bulbous bow near the water surface in [N]
    fn bulb_resistance(&self, v: f64, rho: f64) -> f64 {
        if self.bulb_area <= 0.0 {
            return 0.0;
        }
        let emergence = self.draught_bow - 1.5 * self.bulb_center;
        let immersion = self.draught_bow - self.bulb_center - 0.25 * self.bulb_area.sqrt();
        if emergence <= 0.0 || immersion <= 0.0 {
            return 0.0;
        }
        let p_b = 0.56 * self.bulb_area.sqrt() / emergence;
        let froude_immersion = v / (GRAVITY * immersion + 0.15 * v.powi(2)).sqrt();
        return 0.11 * (-3.0 * p_b.powf(-2.0)).exp() * froude_immersion.powi(3) * self.bulb_area.powf(1.5) * rho * GRAVITY / (1.0 + froude_immersion.powi(2));
    }

    /// Additional pressure resistance of the immersed transom in [N]
    fn transom_resistance(&self, v: f64, rho: f64) -> f64 {
        if self.transom_area <= 0.0 {
            return 0.0;
        }
        let froude_transom = v / (2.0 * GRAVITY * self.transom_area / (self.breadth + self.breadth * self.waterplane_coefficient)).sqrt();
        let c6 = if froude_transom < 5.0 { 0.2 * (1.0 - 0.2 * froude_transom) } else { 0.0 };
        return 0.5 * rho * v.powi(2) * self.transom_area * c6;
    }
}

impl PropulsionModel for InlandEngineModel {
    /// Total resistance R_tot = R_F*(1+k1) + R_APP + R_W + R_B + R_TR + R_A after Holtrop & Mennen,
    /// evaluated at the shallow-water corrected speed
    fn total_resistance(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<uom::si::f64::Force, EstimationError> {
        let v = speed.get::<uom::si::velocity::meter_per_second>();
        let depth = effective_depth.get::<uom::si::length::meter>();
        if v <= 0.0 {
            return Err(EstimationError::domain("total resistance", v, "speed must be positive"));
        }
        if depth <= 0.0 {
            return Err(EstimationError::domain("total resistance", depth, "effective depth must be positive"));
        }

        let v1 = self.shallow_water_speed(v, depth)?;
        let rho = self.water_density * 1000.0;  // [kg/m^3]

        // Frictional resistance, ITTC-57 line with the Holtrop form factor
        let reynolds_number = v1 * self.length / self.parameters.kinematic_viscosity;
        let friction_coefficient = 0.075 / (reynolds_number.log10() - 2.0).powi(2);
        let frictional = 0.5 * rho * v1.powi(2) * self.wetted_surface * friction_coefficient * self.form_factor();

        // Appendage resistance with the documented (1+k2) factor
        let appendage = 0.5 * rho * v1.powi(2) * self.appendage_area * self.parameters.appendage_factor * friction_coefficient;

        let wave = self.wave_resistance(v1, rho);
        let bulb = self.bulb_resistance(v1, rho);
        let transom = self.transom_resistance(v1, rho);

        // Model-ship correlation allowance
        let c3 = if self.bulb_area > 0.0 {
            0.56 * self.bulb_area.powf(1.5) / (self.breadth * self.mean_draught * (0.31 * self.bulb_area.sqrt() + self.draught_bow - self.bulb_center))
        } else {
            0.0
        };
        let c2 = (-1.89 * c3.sqrt()).exp();
        let c4 = (self.draught_bow / self.length).min(0.04);
        let correlation_coefficient = 0.006 * (self.length + 100.0).powf(-0.16) - 0.00205
            + 0.003 * (self.length / 7.5).sqrt() * self.block_coefficient.powi(4) * c2 * (0.04 - c4);
        let correlation = 0.5 * rho * v1.powi(2) * self.wetted_surface * correlation_coefficient;

        let total = frictional + appendage + wave + bulb + transom + correlation;
        return Ok(uom::si::f64::Force::new::<uom::si::force::newton>(total));
    }

    /// Propulsion power through the efficiency chain, total power with the hotel power on top,
    /// and the installed power as configured
    fn total_power_required(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<PowerRequirement, EstimationError> {
        let resistance = self.total_resistance(speed, effective_depth)?;
        let v = speed.get::<uom::si::velocity::meter_per_second>();

        let effective_power = resistance.get::<uom::si::force::newton>() * v / 1000.0;  // [kW]
        let chain_efficiency = self.hull_efficiency * self.parameters.eta_open_water * self.parameters.eta_relative_rotative * self.parameters.eta_transmission * self.parameters.eta_gearing;
        let propulsion = effective_power / chain_efficiency;
        let total = propulsion + self.hotel_power;

        return Ok(PowerRequirement {
            propulsion: uom::si::f64::Power::new::<uom::si::power::kilowatt>(propulsion),
            total: uom::si::f64::Power::new::<uom::si::power::kilowatt>(total),
            installed: self.parameters.installed_power,
        });
    }
}

// Emission factors
//----------------------------------------------------
/// Construction year bracket index used by the factor tables, CCNR emission stages
fn year_bracket(construction_year: i32) -> usize {
    match construction_year {
        ..=1974 => 0,
        1975..=1989 => 1,
        1990..=2001 => 2,
        2002..=2007 => 3,
        2008..=2019 => 4,
        _ => 5,
    }
}

impl InlandEngineModel {
    /// Partial load ratio P_tot/P_installed clamped to [0.05, 1]
    fn partial_load(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<f64, EstimationError> {
        let power = self.total_power_required(speed, effective_depth)?;
        let ratio = power.total.get::<uom::si::power::kilowatt>() / power.installed.get::<uom::si::power::kilowatt>();
        return Ok(ratio.clamp(0.05, 1.0));
    }

    /// Factor for heavier fuel use of smaller engines [-]
    fn weight_class_factor(&self) -> f64 {
        match self.parameters.weight_class {
            WeightClass::L1 => 1.05,
            WeightClass::L2 => 1.02,
            WeightClass::L3 => 1.0,
        }
    }

    /// Low load penalty, engines run dirtier below 35 percent load [-]
    fn low_load_penalty(&self, load: f64, strength: f64) -> f64 {
        if load >= 0.35 {
            return 1.0;
        }
        return 1.0 + strength * (0.35 - load) / 0.35;
    }
}

impl EmissionModel for InlandEngineModel {
    /// Base specific fuel consumption by engine age, corrected for weight class and partial load
    fn specific_fuel_consumption(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<f64, EstimationError> {
        // [g/kWh] per construction year bracket
        const SFC_BASE: [f64; 6] = [235.0, 230.0, 225.0, 220.0, 210.0, 205.0];
        let load = self.partial_load(speed, effective_depth)?;
        let base = SFC_BASE[year_bracket(self.parameters.construction_year)];
        return Ok(base * self.weight_class_factor() * self.low_load_penalty(load, 0.2));
    }

    /// Emission factors by engine age. CO2 follows the fuel burned, NOx and PM10 follow the
    /// CCNR I/II and Stage V limits for the engine's construction year
    fn emission_factors(&self, speed: uom::si::f64::Velocity, effective_depth: uom::si::f64::Length) -> Result<EmissionFactors, EstimationError> {
        // [g/kWh] per construction year bracket
        const NOX_BASE: [f64; 6] = [10.8, 10.6, 10.4, 9.2, 7.0, 2.1];
        const PM10_BASE: [f64; 6] = [0.6, 0.5, 0.4, 0.3, 0.2, 0.015];

        let load = self.partial_load(speed, effective_depth)?;
        let bracket = year_bracket(self.parameters.construction_year);
        let class_factor = self.weight_class_factor();

        let sfc = self.specific_fuel_consumption(speed, effective_depth)?;
        let co2 = CO2_PER_GRAM_FUEL * sfc;
        let nox = NOX_BASE[bracket] * class_factor * self.low_load_penalty(load, 0.3);
        let pm10 = PM10_BASE[bracket] * class_factor * self.low_load_penalty(load, 0.8);

        return Ok(EmissionFactors { co2, nox, pm10 });
    }
}

// Set up tests here
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn meters(value: f64) -> uom::si::f64::Length {
        uom::si::f64::Length::new::<uom::si::length::meter>(value)
    }

    fn meters_per_second(value: f64) -> uom::si::f64::Velocity {
        uom::si::f64::Velocity::new::<uom::si::velocity::meter_per_second>(value)
    }

    fn kilowatts(value: f64) -> uom::si::f64::Power {
        uom::si::f64::Power::new::<uom::si::power::kilowatt>(value)
    }

    /// The cargo vessel with its 32.7 MW tanker engine
    fn cargo_engine() -> InlandEngineModel {
        let vessel = VesselGeometry::new(meters(205.0), meters(32.0), meters(10.0), meters(10.0), uom::si::f64::Mass::new::<uom::si::mass::ton>(37500.0), Some(0.75), Some(0.98), 1, true, true);
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(30.0), meters(0.0), meters(400.0), 0.0, meters(0.2));
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        let mut parameters = EngineParameters::new(kilowatts(32700.0), WeightClass::L3, 2020);
        parameters.c_stern = 10.0;
        parameters.bulb_breadth_coefficient = 0.0638;
        parameters.appendage_factor = 1.5;
        parameters.appendage_area_fraction = 0.0065;
        parameters.bulb_center_fraction = 0.4;
        parameters.transom_area_fraction = 0.05;
        parameters.vessel_class = VesselClass::Tanker;
        parameters.propeller_diameter = Some(meters(8.0));
        InlandEngineModel::new(&vessel, &channel, &state, parameters).unwrap()
    }

    #[test]
    fn resistance_is_positive_and_increasing_test() {
        let engine = cargo_engine();
        let depth = meters(30.0);
        let mut last = 0.0;
        for i in 1..=10 {
            let resistance = engine.total_resistance(meters_per_second(i as f64), depth).unwrap();
            let kilonewtons = resistance.get::<uom::si::force::kilonewton>();
            assert!(kilonewtons > last, "resistance should grow with speed, got {} kN after {} kN", kilonewtons, last);
            last = kilonewtons;
        }
        // Ballpark check at 7 m/s, a few hundred kN for a 205 m tanker
        let resistance = engine.total_resistance(meters_per_second(7.0), depth).unwrap();
        let kilonewtons = resistance.get::<uom::si::force::kilonewton>();
        assert!(kilonewtons > 100.0 && kilonewtons < 1500.0, "unexpected resistance magnitude: {} kN", kilonewtons);
    }

    #[test]
    fn power_chain_test() {
        let engine = cargo_engine();
        let power = engine.total_power_required(meters_per_second(6.0), meters(30.0)).unwrap();

        // Total power is the propulsion power plus the hotel power
        let hotel = power.total.get::<uom::si::power::kilowatt>() - power.propulsion.get::<uom::si::power::kilowatt>();
        assert_relative_eq!(hotel, 0.05 * 32700.0, epsilon = 1e-6);
        // Installed power is passed through as configured
        assert_relative_eq!(power.installed.get::<uom::si::power::kilowatt>(), 32700.0, epsilon = 1e-12);
        // The chain P_E -> P_propulsion only divides by efficiencies so propulsion power must exceed R*v
        let resistance = engine.total_resistance(meters_per_second(6.0), meters(30.0)).unwrap();
        let effective = resistance.get::<uom::si::force::newton>() * 6.0 / 1000.0;
        assert!(power.propulsion.get::<uom::si::power::kilowatt>() > effective);
    }

    #[test]
    fn shallow_water_increases_resistance_test() {
        let engine = cargo_engine();
        let deep = engine.total_resistance(meters_per_second(5.0), meters(30.0)).unwrap();
        let shallow = engine.total_resistance(meters_per_second(5.0), meters(14.0)).unwrap();
        assert!(shallow > deep, "shallow water should add resistance");
    }

    #[test]
    fn emission_factors_by_construction_year_test() {
        let engine = cargo_engine();
        let factors = engine.emission_factors(meters_per_second(6.0), meters(30.0)).unwrap();
        let sfc = engine.specific_fuel_consumption(meters_per_second(6.0), meters(30.0)).unwrap();

        // 2020 engine, Stage V NOx and PM10 limits, CO2 tied to the fuel burned
        assert_relative_eq!(factors.co2, CO2_PER_GRAM_FUEL * sfc, epsilon = 1e-9);
        assert!(factors.nox < 3.0);
        assert!(factors.pm10 < 0.1);

        // An older engine of the same ship emits more of everything
        let vessel = VesselGeometry::new(meters(205.0), meters(32.0), meters(10.0), meters(10.0), uom::si::f64::Mass::new::<uom::si::mass::ton>(37500.0), Some(0.75), Some(0.98), 1, true, true);
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(30.0), meters(0.0), meters(400.0), 0.0, meters(0.2));
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        let old_engine = InlandEngineModel::new(&vessel, &channel, &state, EngineParameters::new(kilowatts(32700.0), WeightClass::L3, 1985)).unwrap();
        let old_factors = old_engine.emission_factors(meters_per_second(6.0), meters(30.0)).unwrap();
        assert!(old_factors.nox > factors.nox);
        assert!(old_factors.pm10 > factors.pm10);
    }

    #[test]
    fn default_parameters_are_filled_in_test() {
        let vessel = VesselGeometry::new(meters(85.0), meters(9.5), meters(2.0), meters(2.0), uom::si::f64::Mass::new::<uom::si::mass::ton>(1373.0), None, None, 2, false, false);
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(0.0), meters(150.0), 0.0, meters(0.2));
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        let engine = InlandEngineModel::new(&vessel, &channel, &state, EngineParameters::new(kilowatts(1070.0), WeightClass::L3, 2010)).unwrap();

        // No hotel power given, the default fraction of the installed power applies
        assert_relative_eq!(engine.hotel_power, 0.05 * 1070.0, epsilon = 1e-9);
        // No propeller diameter given, derived from the mean draught
        assert_relative_eq!(engine.propeller_diameter, 0.7 * 2.0, epsilon = 1e-12);
        // No bulbous bow and no transom stern, their areas must vanish
        assert_eq!(engine.bulb_area, 0.0);
        assert_eq!(engine.transom_area, 0.0);
    }

    #[test]
    fn invalid_speed_and_depth_are_domain_errors_test() {
        let engine = cargo_engine();
        assert!(matches!(engine.total_resistance(meters_per_second(0.0), meters(30.0)), Err(EstimationError::Domain { .. })));
        assert!(matches!(engine.total_resistance(meters_per_second(5.0), meters(0.0)), Err(EstimationError::Domain { .. })));
    }

    #[test]
    fn invalid_efficiency_is_a_configuration_error_test() {
        let vessel = VesselGeometry::new(meters(85.0), meters(9.5), meters(2.0), meters(2.0), uom::si::f64::Mass::new::<uom::si::mass::ton>(1373.0), None, None, 2, false, false);
        let channel = ChannelGeometry::new(1.0, meters(0.0), meters(3.0), meters(0.0), meters(150.0), 0.0, meters(0.2));
        let state = ChannelState::derive(&vessel, &channel).unwrap();
        let mut parameters = EngineParameters::new(kilowatts(1070.0), WeightClass::L3, 2010);
        parameters.eta_open_water = 0.0;
        assert!(matches!(InlandEngineModel::new(&vessel, &channel, &state, parameters), Err(EstimationError::Configuration { .. })));
    }
}

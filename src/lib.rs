/// Inland vessel estimator estimates the squat, the grounding-limited speed, the hull resistance and the power/emission profile of marine vessels sailing in confined waterways.
/// Author: G0rocks
/// Date: 2025-06-10
/// The vessel/channel hydrodynamics follow the empirical squat formulas of Hooft (1974), Römisch (1989) and Ankudinov (2000) capped by the critical speed of the cross-section.
/// The resistance and power estimation follows Holtrop & Mennen and is only coupled to the squat core through the PropulsionModel and EmissionModel traits.

/// External crates
use csv;    // CSV writer to save result tables
use uom::{self};    // Units of measurement. Makes sure that the correct units are used for every calculation
use plotly; // Plotly for visualizing the squat, resistance and power curves
use std::io; // To use errors

// Internal modules
pub mod estimators;
pub use crate::estimators::*; // Import the estimators module
pub mod propulsion;
pub use crate::propulsion::*; // Import the propulsion module
pub mod vessels;
pub use crate::vessels::*; // Import the vessels module

// Constants
//----------------------------------------------------
/// Gravitational acceleration in [m/s^2]
pub const GRAVITY: f64 = 9.81;

// Structs and enums
//----------------------------------------------------
/// Error type of the estimator.
/// Configuration errors come up once when a scenario is set up, domain errors come up at the
/// offending evaluation and carry the value that left the formula's domain.
/// No retries happen anywhere, every failure goes straight to the caller.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    /// Invalid or contradictory vessel, channel or engine configuration
    #[error("invalid configuration for {field}: {message}")]
    Configuration {
        /// The offending configuration field
        field: &'static str,
        message: String,
    },
    /// A formula was evaluated outside its mathematical domain
    #[error("domain violation in {context}: {message} (got {value})")]
    Domain {
        /// The formula or coefficient that failed
        context: &'static str,
        /// The offending value
        value: f64,
        message: &'static str,
    },
}

impl EstimationError {
    /// Creates a new configuration error
    pub fn configuration(field: &'static str, message: impl Into<String>) -> EstimationError {
        EstimationError::Configuration {
            field,
            message: message.into(),
        }
    }

    /// Creates a new domain error
    pub fn domain(context: &'static str, value: f64, message: &'static str) -> EstimationError {
        EstimationError::Domain {
            context,
            value,
            message,
        }
    }
}

// Functions
//----------------------------------------------------
/// Saves the given speed profile to a csv file at csv_file_path.
/// Will overwrite any file with the same file name at csv_file_path.
/// Does not append rows to existing csv files.
/// csv_file_path must end with ".csv"
/// The delimiter is a semicolon and the header names the unit of every column.
pub fn save_speed_profile_to_csv(csv_file_path: &str, profile: &SpeedProfile) -> Result<String, io::Error> {
    // Check if csv_file_path ends with ".csv"
    let num_chars = csv_file_path.chars().count();
    if num_chars < 4 || &csv_file_path[(num_chars-4)..] != ".csv" {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "The filepath must end with \".csv\""));
    }

    // Create a CSV writer with a semicolon delimiter
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_path(csv_file_path)?;

    // Write the header
    wtr.write_record(&["velocity[m/s]","squat[m]","effective_depth[m]","resistance[kN]","P_propulsion[kW]","P_tot[kW]","P_installed[kW]","SFC[g/kWh]","fuel[kg/h]","CO2[kg/h]","NOx[kg/h]","PM10[kg/h]"])?;

    // Write one record per sampled speed
    for i in 0..profile.speeds.len() {
        // Get velocity
        let velocity = profile.speeds[i].get::<uom::si::velocity::meter_per_second>().to_string();
        // Get squat
        let squat = profile.squat[i].get::<uom::si::length::meter>().to_string();
        // Get effective depth
        let effective_depth = profile.effective_depth[i].get::<uom::si::length::meter>().to_string();
        // Get resistance
        let resistance = profile.resistance[i].get::<uom::si::force::kilonewton>().to_string();
        // Get the power columns
        let propulsion_power = profile.propulsion_power[i].get::<uom::si::power::kilowatt>().to_string();
        let total_power = profile.total_power[i].get::<uom::si::power::kilowatt>().to_string();
        let installed_power = profile.installed_power[i].get::<uom::si::power::kilowatt>().to_string();
        // Get the fuel and emission columns
        let specific_fuel_consumption = profile.specific_fuel_consumption[i].to_string();
        let fuel_rate = profile.fuel_rate[i].to_string();
        let co2_rate = profile.co2_rate[i].to_string();
        let nox_rate = profile.nox_rate[i].to_string();
        let pm10_rate = profile.pm10_rate[i].to_string();

        // Write the record
        wtr.write_record(&[
            velocity,
            squat,
            effective_depth,
            resistance,
            propulsion_power,
            total_power,
            installed_power,
            specific_fuel_consumption,
            fuel_rate,
            co2_rate,
            nox_rate,
            pm10_rate,
        ])?;
    }

    // Flush and close the writer
    wtr.flush()?;
    return Ok(("Saved speed profile to csv file").to_string());
}

/// Visualize the squat curve of a speed profile with plotly
/// figure_file_path: Option<&str> - Path to the file where the figure will be saved. If None, the figure will not be saved to a file.
pub fn visualize_squat_profile(profile: &SpeedProfile, figure_file_path: Option<&str>) -> Result<(), io::Error> {
    // Collect the speed axis and the squat values
    let speed_vec: Vec<f64> = profile.speeds.iter().map(|v| v.get::<uom::si::velocity::meter_per_second>()).collect();
    let squat_vec: Vec<f64> = profile.squat.iter().map(|s| s.get::<uom::si::length::meter>()).collect();

    // Setup trace of the squat curve
    let trace = plotly::Scatter::new(speed_vec, squat_vec)
                    .name("Squat (m)")
                    .mode(plotly::common::Mode::Lines)
                    .show_legend(true);

    // Create a plotly figure with the trace
    let mut figure = plotly::Plot::new();
    figure.add_trace(trace);

    // Open plot
    figure.show();

    // Save the figure to a file if file path is provided
    if let Some(file_path) = figure_file_path {
        figure.write_html(file_path);
    }

    // Return Ok if all went well
    return Ok(());
}

/// Visualize the total resistance curve of a speed profile with plotly
/// figure_file_path: Option<&str> - Path to the file where the figure will be saved. If None, the figure will not be saved to a file.
pub fn visualize_resistance_profile(profile: &SpeedProfile, figure_file_path: Option<&str>) -> Result<(), io::Error> {
    // Collect the speed axis and the resistance values
    let speed_vec: Vec<f64> = profile.speeds.iter().map(|v| v.get::<uom::si::velocity::meter_per_second>()).collect();
    let resistance_vec: Vec<f64> = profile.resistance.iter().map(|r| r.get::<uom::si::force::kilonewton>()).collect();

    // Setup trace of the resistance curve
    let trace = plotly::Scatter::new(speed_vec, resistance_vec)
                    .name("Total resistance (kN)")
                    .mode(plotly::common::Mode::Lines)
                    .show_legend(true);

    // Create a plotly figure with the trace
    let mut figure = plotly::Plot::new();
    figure.add_trace(trace);

    // Open plot
    figure.show();

    // Save the figure to a file if file path is provided
    if let Some(file_path) = figure_file_path {
        figure.write_html(file_path);
    }

    // Return Ok if all went well
    return Ok(());
}

/// Visualize the three power curves of a speed profile with plotly, the power required at the
/// propellers, the total power required and the installed power
/// figure_file_path: Option<&str> - Path to the file where the figure will be saved. If None, the figure will not be saved to a file.
pub fn visualize_power_profile(profile: &SpeedProfile, figure_file_path: Option<&str>) -> Result<(), io::Error> {
    // Collect the speed axis and the three power columns
    let speed_vec: Vec<f64> = profile.speeds.iter().map(|v| v.get::<uom::si::velocity::meter_per_second>()).collect();
    let propulsion_vec: Vec<f64> = profile.propulsion_power.iter().map(|p| p.get::<uom::si::power::kilowatt>()).collect();
    let total_vec: Vec<f64> = profile.total_power.iter().map(|p| p.get::<uom::si::power::kilowatt>()).collect();
    let installed_vec: Vec<f64> = profile.installed_power.iter().map(|p| p.get::<uom::si::power::kilowatt>()).collect();

    // Create a plotly figure with one trace per power column
    let mut figure = plotly::Plot::new();
    figure.add_trace(plotly::Scatter::new(speed_vec.clone(), propulsion_vec)
        .name("P_propulsion (kW)")
        .mode(plotly::common::Mode::Lines));
    figure.add_trace(plotly::Scatter::new(speed_vec.clone(), total_vec)
        .name("P_tot (kW)")
        .mode(plotly::common::Mode::Lines));
    figure.add_trace(plotly::Scatter::new(speed_vec, installed_vec)
        .name("P_installed (kW)")
        .mode(plotly::common::Mode::Lines));

    // Open plot
    figure.show();

    // Save the figure to a file if file path is provided
    if let Some(file_path) = figure_file_path {
        figure.write_html(file_path);
    }

    // Return Ok if all went well
    return Ok(());
}

/// Here the inland vessel estimator is demonstrated on the seagoing cargo vessel in an unrestricted channel (W = 400 m, h0 = 30 m).

use inland_vessel_estimator::*; // Import everything from the inland_vessel_estimator crate

fn main() {
    // Vessel and channel properties of the reference scenario
    let vessel = VesselGeometry::new(
        uom::si::f64::Length::new::<uom::si::length::meter>(205.0),
        uom::si::f64::Length::new::<uom::si::length::meter>(32.0),
        uom::si::f64::Length::new::<uom::si::length::meter>(10.0),
        uom::si::f64::Length::new::<uom::si::length::meter>(10.0),
        uom::si::f64::Mass::new::<uom::si::mass::ton>(37500.0),
        Some(0.75),
        Some(0.98),
        1,
        true,
        true,
    );
    let channel = ChannelGeometry::new(
        1.0,
        uom::si::f64::Length::new::<uom::si::length::meter>(0.0),
        uom::si::f64::Length::new::<uom::si::length::meter>(30.0),
        uom::si::f64::Length::new::<uom::si::length::meter>(0.0),
        uom::si::f64::Length::new::<uom::si::length::meter>(400.0),
        0.0,
        uom::si::f64::Length::new::<uom::si::length::meter>(0.2),
    );

    // Derive the channel state
    let state = ChannelState::derive(&vessel, &channel).expect("Failed to derive the channel state");
    println!("Effective width Weff: {:.2} m", state.effective_width.get::<uom::si::length::meter>());
    println!("Limit speed: {:.2} m/s", state.limit_speed.get::<uom::si::velocity::meter_per_second>());

    // Squat at the limit speed
    let squat = calculate_squat(&vessel, &state, state.limit_speed).expect("Failed to calculate the squat");
    println!("Squat: {:.2} m", squat.governing.get::<uom::si::length::meter>());

    // Find the grounding speed
    let config = GroundingSearchConfig::default();
    let outcome = find_grounding_speed(&vessel, &channel, &state, &config).expect("Failed to run the grounding speed scan");
    match outcome {
        GroundingOutcome::Grounded { speed, squat } => {
            println!("Grounding velocity: {:.2} m/s", speed.get::<uom::si::velocity::meter_per_second>());
            println!("Squat: {:.2} m", squat.get::<uom::si::length::meter>());
        }
        GroundingOutcome::LimitSpeedBound { .. } => {
            println!("Grounding velocity greater than Limit speed");
        }
    }

    // Engine of the reference scenario, a 32.7 MW tanker engine built in 2020
    let mut parameters = EngineParameters::new(
        uom::si::f64::Power::new::<uom::si::power::kilowatt>(32700.0),
        WeightClass::L3,
        2020,
    );
    parameters.c_stern = 10.0;
    parameters.bulb_breadth_coefficient = 0.0638;
    parameters.appendage_factor = 1.5;
    parameters.appendage_area_fraction = 0.0065;
    parameters.bulb_center_fraction = 0.4;
    parameters.transom_area_fraction = 0.05;
    parameters.vessel_class = VesselClass::Tanker;
    parameters.propeller_diameter = Some(uom::si::f64::Length::new::<uom::si::length::meter>(8.0));
    let engine = InlandEngineModel::new(&vessel, &channel, &state, parameters).expect("Failed to set up the engine model");

    // Sweep the speed profile and save it next to the binary
    let profile = estimate_speed_profile(&vessel, &channel, &state, &engine, &config).expect("Failed to estimate the speed profile");
    match save_speed_profile_to_csv("speed_profile.csv", &profile) {
        Ok(message) => println!("{}", message),
        Err(error) => eprintln!("Could not save the speed profile: {}", error),
    }
}

//! Default tuning values used across the simulation.
//!
//! These are the stock values for a freshly constructed [`crate::Tuning`].
//! Distances are world units (pixels of the tile map), times are seconds and
//! angles are degrees unless the name says otherwise.

// Truck kinematics.
/// Forward acceleration in units per second squared.
pub const TRUCK_ACCELERATION: f32 = 200.0;
/// Top forward speed.
pub const TRUCK_MAX_SPEED: f32 = 300.0;
/// Top reverse speed; negative along the heading.
pub const TRUCK_REVERSE_SPEED: f32 = -150.0;
/// Multiplicative speed decay applied once per frame when coasting.
pub const TRUCK_FRICTION: f32 = 0.95;
/// Degrees per second at full speed.
pub const TRUCK_TURN_SPEED: f32 = 180.0;
/// Normalised speed (`|speed| / max`) the truck must exceed before it can steer.
pub const TRUCK_MIN_TURN_SPEED: f32 = 0.3;
/// Multiplier on acceleration while braking against forward motion.
pub const TRUCK_BRAKE_FACTOR: f32 = 1.5;
/// Per-frame speed multiplier while the handbrake is held.
pub const TRUCK_HANDBRAKE_FACTOR: f32 = 0.85;
/// Coasting speeds below this magnitude snap to zero.
pub const TRUCK_STOP_EPSILON: f32 = 5.0;
/// Truck footprint along its heading.
pub const TRUCK_WIDTH: f32 = 64.0;
/// Truck footprint across its heading.
pub const TRUCK_HEIGHT: f32 = 32.0;

// Impacts and contamination.
/// Fraction of speed kept after hitting an obstacle.
pub const COLLISION_SPEED_SCRUB: f32 = 0.3;
/// Dirt added by one obstacle hit.
pub const COLLISION_DIRT: f32 = 0.14;
/// Dirt gained per second when driving at full speed.
pub const DIRT_GAIN_RATE: f32 = 0.06;
/// Blood lost per second once the truck stops crushing things.
pub const BLOOD_DECAY_RATE: f32 = 0.02;

// Jump.
/// Airborne time of one jump.
pub const JUMP_DURATION: f32 = 0.42;
/// Time after takeoff before the next jump is allowed.
pub const JUMP_COOLDOWN: f32 = 1.0;
/// Draw scale at the top of the jump pulse.
pub const JUMP_SCALE_PEAK: f32 = 1.16;
/// Time to reach [`JUMP_SCALE_PEAK`]; the pulse returns over the same span.
pub const JUMP_SCALE_RISE: f32 = 0.11;
/// Truck opacity while airborne.
pub const JUMP_ALPHA: f32 = 0.82;

// Trailer hitch.
/// Distance from the truck pivot back to the hitch.
pub const TRAILER_HITCH_OFFSET: f32 = 18.0;
/// Distance from the hitch back to the trailer pivot.
pub const TRAILER_CONNECTION_DISTANCE: f32 = 52.0;
/// Base per-frame blend toward the trailer target pose.
pub const TRAILER_FOLLOW_SMOOTHNESS: f32 = 0.1;
/// Extra smoothness per second of frame time.
pub const TRAILER_SMOOTHNESS_GAIN: f32 = 0.7;
/// Upper bound on the per-frame blend.
pub const TRAILER_SMOOTHNESS_CAP: f32 = 0.22;
/// Rotation blend relative to the position blend.
pub const TRAILER_ROTATION_FACTOR: f32 = 1.7;
/// Largest articulation between truck and trailer.
pub const TRAILER_MAX_ANGLE: f32 = 60.0;
/// Sprite rotation offset added to the drawn trailer angle.
pub const TRAILER_TEXTURE_OFFSET: f32 = 0.0;
/// Degrees of flip spin granted per jump.
pub const TRAILER_FLIP_BUDGET: f32 = 360.0;
/// Degrees per second spent from the flip budget.
pub const TRAILER_FLIP_RATE: f32 = 860.0;
/// Trailer footprint along its heading.
pub const TRAILER_WIDTH: f32 = 72.0;
/// Trailer footprint across its heading.
pub const TRAILER_HEIGHT: f32 = 30.0;

// Mission timing and scoring.
/// Time budget for single-delivery missions.
pub const MISSION_TIME_LIMIT: f32 = 120.0;
/// Time budget for the time trial.
pub const TIME_TRIAL_TIME_LIMIT: f32 = 90.0;
/// Time budget for the multi-stop route.
pub const MULTI_STOP_TIME_LIMIT: f32 = 180.0;
/// Base points per second left on the clock.
pub const POINTS_PER_SECOND: f32 = 10.0;
/// Points lost per obstacle hit.
pub const COLLISION_PENALTY: i64 = 50;
/// Finishing faster than this many seconds earns the speed bonus.
pub const SPEED_BONUS_THRESHOLD: f32 = 90.0;
/// Speed bonus points per second under the threshold.
pub const SPEED_BONUS_PER_SECOND: f32 = 5.0;
/// Bonus for finishing without a collision.
pub const PERFECT_DELIVERY_BONUS: i64 = 500;
/// Share of the base score paid out by the careful bonus.
pub const CAREFUL_BONUS_RATIO: f32 = 0.5;
/// Most collisions a careful run may take and keep its bonus.
pub const CAREFUL_MAX_COLLISIONS: u32 = 1;
/// Flat bonus for completing every stop of the multi-stop route.
pub const MULTI_STOP_BONUS: i64 = 1000;

// Encounters.
/// Truck speed above which traffic is crushed.
pub const TRAFFIC_LETHAL_SPEED: f32 = 100.0;
/// Points for crushing a traffic vehicle.
pub const TRAFFIC_CRUSH_BONUS: i64 = 100;
/// Speed given to a traffic vehicle shoved by a slow truck.
pub const TRAFFIC_BUMP_SPEED: f32 = 120.0;
/// Spin-out time of crushed traffic before removal.
pub const TRAFFIC_CRUSH_FADE: f32 = 1.0;
/// Distance beyond the map edge at which traffic wraps around.
pub const TRAFFIC_WRAP_MARGIN: f32 = 50.0;
/// Fraction per second by which bumped traffic steers back to its lane speed.
pub const TRAFFIC_RECOVERY_RATE: f32 = 1.5;
/// Multiplier on the idle speed of pedestrians and wildlife.
pub const WANDER_SPEED_SCALE: f32 = 1.0;
/// Truck speed above which a pedestrian is crushed.
pub const PEDESTRIAN_LETHAL_SPEED: f32 = 120.0;
/// Truck speed above which a flag carrier is crushed.
pub const FLAG_CARRIER_LETHAL_SPEED: f32 = 130.0;
/// Truck speed above which a wheelchair user is crushed.
pub const WHEELCHAIR_LETHAL_SPEED: f32 = 140.0;
/// Truck speed above which a squirrel is crushed.
pub const SQUIRREL_LETHAL_SPEED: f32 = 90.0;
/// Crush score for a pedestrian.
pub const PEDESTRIAN_CRUSH_SCORE: i64 = 25;
/// Crush score for a flag carrier.
pub const FLAG_CARRIER_CRUSH_SCORE: i64 = 50;
/// Crush score for a wheelchair user.
pub const WHEELCHAIR_CRUSH_SCORE: i64 = 75;
/// Crush score for wildlife; negative.
pub const SQUIRREL_CRUSH_SCORE: i64 = -50;
/// Blood added to the truck per crush.
pub const CRUSH_BLOOD: f32 = 0.25;
/// Number of decals kept before the oldest are recycled.
pub const MAX_DECALS: usize = 64;

// Population density.
/// Traffic vehicles per million square units.
pub const TRAFFIC_DENSITY: f32 = 4.0;
/// Pedestrians per million square units.
pub const PEDESTRIAN_DENSITY: f32 = 6.0;
/// Animals per million square units.
pub const WILDLIFE_DENSITY: f32 = 3.0;

/// Largest frame delta accepted by the plugin before clamping.
pub const MAX_FRAME_DELTA: f32 = 0.1;

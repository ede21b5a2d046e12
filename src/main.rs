use std::env;
use std::process::ExitCode;

use anyhow::Result;
use env_logger;
use log::{error, info};

use dgm_exception::{bail_exception, ErrorCode, Exception, FactoryError};

// Classes the demo registry knows how to build.
const REGISTERED_CLASSES: &[&str] = &["Device", "DeviceSimulator", "RosInterpreter", "TfListener"];

struct Entity {
    class_name: String,
    instance_name: String,
}

fn instantiate(class_name: &str, instance_name: &str) -> Result<Entity> {
    if class_name.is_empty() {
        bail_exception!(FactoryError::SyntaxError, "Empty class name.");
    }
    if !REGISTERED_CLASSES.contains(&class_name) {
        bail_exception!(
            FactoryError::UnreferedObject,
            "Unknown entity class ",
            "<{}> (known: {}).",
            class_name,
            REGISTERED_CLASSES.join(", ")
        );
    }
    Ok(Entity {
        class_name: class_name.to_string(),
        instance_name: instance_name.to_string(),
    })
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<Exception>() {
        Some(e) => match e.error_code() {
            ErrorCode::Factory(FactoryError::UnreferedObject) => {
                error!("{}", e);
                info!("register the class before creating an instance of it");
            }
            _ => error!("{:#}", e),
        },
        None => error!("{:?}", err),
    }
}

fn main() -> ExitCode {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "debug");
    }
    env_logger::init();

    let mut failures = 0;
    for (i, class_name) in env::args().skip(1).enumerate() {
        match instantiate(&class_name, &format!("entity_{}", i)) {
            Ok(entity) => info!("created {} of class {}", entity.instance_name, entity.class_name),
            Err(err) => {
                report(&err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[test]
fn test_instantiate_known_class() -> Result<()> {
    let entity = instantiate("Device", "robot")?;
    assert_eq!(entity.class_name, "Device");
    assert_eq!(entity.instance_name, "robot");
    Ok(())
}

#[test]
fn test_instantiate_unknown_class() -> Result<()> {
    let err = match instantiate("Gripper", "g") {
        Ok(_) => return Err(anyhow::anyhow!("Gripper is not registered")),
        Err(err) => err,
    };
    let e = err
        .downcast_ref::<Exception>()
        .ok_or_else(|| anyhow::anyhow!("not an exception: {:?}", err))?;
    assert_eq!(e.code(), 401);
    assert_eq!(
        e.message(),
        "Unknown entity class <Gripper> (known: Device, DeviceSimulator, RosInterpreter, TfListener)."
    );
    Ok(())
}

#[test]
fn test_instantiate_empty_class() {
    let err = instantiate("", "e").err().expect("empty class must fail");
    let e = err.downcast_ref::<Exception>().expect("exception");
    assert_eq!(e.error_code(), ErrorCode::Factory(FactoryError::SyntaxError));
}

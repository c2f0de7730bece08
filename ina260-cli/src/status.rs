use ina260::registers::Register;
use ina260::{Ina260, Transport};

use crate::config::print_configuration;

pub(crate) fn action<T: Transport>(ina: &mut Ina260<T>) {
    println!("state:           {:?}", ina.state());
    println!("address:         {:#04X}", ina.address());
    println!("frequency:       {} Hz", ina.frequency());

    match ina.read_manufacturer_id() {
        Ok(id) => println!("manufacturer:    {id}"),
        Err(e) => println!("manufacturer:    ERR ({e})"),
    }
    match ina.read_device_id() {
        Ok(id) => println!(
            "device:          {:#05X} revision {}{}",
            id.device_id(),
            id.revision(),
            if id.is_ina260() { "" } else { " (not an INA260)" }
        ),
        Err(e) => println!("device:          ERR ({e})"),
    }

    let cache = *ina.cache();
    println!(
        "last written:    configuration {:#06X}, mask/enable {:#06X}, alert limit {:#06X}",
        cache.configuration.raw(),
        cache.mask_enable.raw(),
        cache.alert_limit.raw()
    );
    match ina.read_configuration() {
        Ok(config) => print_configuration(config),
        Err(e) => println!("configuration:   ERR ({e})"),
    }
}

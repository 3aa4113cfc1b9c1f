#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlmodel::{from_xml_str, to_xml_string, FieldDescriptor, ScalarKind, Schema};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(item) = Schema::builder("item")
        .field(FieldDescriptor::integer("id"))
        .field(FieldDescriptor::boolean("done").optional())
        .build()
    else {
        return;
    };
    let Ok(schema) = Schema::builder("list")
        .field(FieldDescriptor::string("name"))
        .field(FieldDescriptor::float("weight").optional())
        .field(FieldDescriptor::record_list("items", item).alias("item"))
        .field(FieldDescriptor::scalar_list("tags", ScalarKind::String).alias("tag"))
        .build()
    else {
        return;
    };

    // Anything that decodes must re-encode to a fixed point
    if let Ok(record) = from_xml_str(s, &schema) {
        let xml = to_xml_string(&record);
        match from_xml_str(&xml, &schema) {
            Ok(again) => assert_eq!(to_xml_string(&again), xml),
            Err(err) => panic!("re-encoded record failed to decode: {err}\n{xml}"),
        }
    }
});

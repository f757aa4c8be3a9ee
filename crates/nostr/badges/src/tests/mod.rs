mod tag_properties;

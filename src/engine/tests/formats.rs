//! JSON and XML exports of the same policy must parse identically.

use super::*;
use crate::loader::SourceFormat;

const COMBINED_XML: &str = r#"<libraryContent>
  <ruleGroup id="g1" name="Group1" enabled="true" defaultRights="2">
    <rules>
      <rule id="r1" name="Rule1" enabled="true">
        <condition>
          <expressions>
            <conditionExpression prefix="URL" operatorId="equals">
              <propertyInstance propertyId="URL.Host">
                <parameters>
                  <entry>
                    <string>domain</string>
                    <parameter valueType="value">
                      <value>
                        <listValue id="list1"/>
                      </value>
                    </parameter>
                  </entry>
                </parameters>
              </propertyInstance>
            </conditionExpression>
          </expressions>
        </condition>
      </rule>
    </rules>
  </ruleGroup>
  <lists>
    <entry>
      <list name="Test List" id="list1" typeId="A" classifier="string">
        <description>desc</description>
        <content>
          <listEntry id="entry1">
            <value>example.com</value>
          </listEntry>
          <listEntry id="entry2">
            <value>example.org</value>
          </listEntry>
        </content>
      </list>
    </entry>
  </lists>
</libraryContent>"#;

#[test]
fn test_xml_and_json_exports_parse_identically() {
    let from_xml = PolicyExport::from_xml_str(COMBINED_XML).unwrap();
    let from_json = PolicyExport::from_value(combined_document());
    assert_eq!(from_xml.parse(), from_json.parse());
}

#[test]
fn test_from_source_dispatches_on_format() {
    let json_text = serde_json::to_string(&combined_document()).unwrap();
    let via_json = PolicyExport::from_source(&json_text, SourceFormat::Json).unwrap();
    let via_xml = PolicyExport::from_source(COMBINED_XML, SourceFormat::Xml).unwrap();
    assert_eq!(via_json.parse(), via_xml.parse());
}

#[test]
fn test_invalid_xml_is_a_decode_error() {
    let err = PolicyExport::from_xml_str("<libraryContent><unclosed>").unwrap_err();
    assert!(matches!(err, crate::PolicyError::XmlDecode(_)));
}

#[test]
fn test_xml_rule_rows_match_expected_values() {
    let export = PolicyExport::from_xml_str(COMBINED_XML).unwrap();
    let data = export.parse();

    assert_eq!(data.rules.len(), 1);
    let rule = &data.rules[0];
    assert_eq!(rule.item.item_id.as_deref(), Some("r1"));
    assert_eq!(rule.item.name.as_deref(), Some("Rule1"));
    assert_eq!(rule.item.enabled, Some(true));
    assert_eq!(rule.item.path, "Group1");

    let condition = rule.condition.as_ref().unwrap();
    assert_eq!(condition.prefix.as_deref(), Some("URL"));
    assert_eq!(condition.property, "URL.Host");
    assert_eq!(
        condition.property_values,
        Some(PropertyValues::Single("list1".to_string()))
    );
}

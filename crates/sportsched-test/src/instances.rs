//! ITC2021 instance text.

/// A phased six-team instance with constraints of every family.
pub const SAMPLE_INSTANCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Instance>
  <MetaData><InstanceName>Sample6</InstanceName></MetaData>
  <Structure>
    <Format leagueIds="0">
      <numberRoundRobin>2</numberRoundRobin>
      <compactness>C</compactness>
      <gameMode>P</gameMode>
    </Format>
  </Structure>
  <ObjectiveFunction><Objective>SC</Objective></ObjectiveFunction>
  <Resources>
    <LeagueGroups/>
    <Leagues><league id="0" name="Sample League"/></Leagues>
    <Teams>
      <team id="0" league="0" name="Ajax"/>
      <team id="1" league="0" name="Bruges"/>
      <team id="2" league="0" name="Celtic"/>
      <team id="3" league="0" name="Dinamo"/>
      <team id="4" league="0" name="Espanyol"/>
      <team id="5" league="0" name="Fenerbahce"/>
    </Teams>
    <Slots>
      <slot id="0" name="R1"/><slot id="1" name="R2"/><slot id="2" name="R3"/>
      <slot id="3" name="R4"/><slot id="4" name="R5"/><slot id="5" name="R6"/>
      <slot id="6" name="R7"/><slot id="7" name="R8"/><slot id="8" name="R9"/>
      <slot id="9" name="R10"/>
    </Slots>
  </Resources>
  <Constraints>
    <CapacityConstraints>
      <CA1 max="1" min="0" mode="H" penalty="1" slots="0;1;2" teams="0" type="HARD"/>
      <CA1 max="2" min="1" mode="A" penalty="3" slots="4;5;6;7" teams="1;2" type="SOFT"/>
      <CA2 max="1" min="0" mode1="HA" mode2="GLOBAL" penalty="5" slots="0;1;2;3" teams1="0;3" teams2="1;2;4" type="SOFT"/>
      <CA3 intp="3" max="1" min="0" mode1="A" mode2="SLOTS" penalty="2" teams1="2" teams2="0;1;3" type="SOFT"/>
      <CA4 max="1" min="0" mode1="H" mode2="EVERY" penalty="1" slots="1;2;8" teams1="0;1" teams2="2;3;4" type="HARD"/>
    </CapacityConstraints>
    <GameConstraints>
      <GA1 max="2" meetings="0,5;3,4;" min="1" penalty="4" slots="0;9" type="SOFT"/>
    </GameConstraints>
    <BreakConstraints>
      <BR1 intp="1" mode2="HA" penalty="1" slots="1;2;3;4;5;6;7;8;9" teams="4" type="HARD"/>
      <BR2 homeMode="HA" intp="8" mode2="LEQ" penalty="1" slots="0;1;2;3;4;5;6;7;8;9" teams="0;1;2;3;4;5" type="SOFT"/>
    </BreakConstraints>
    <FairnessConstraints>
      <FA2 intp="1" mode="H" penalty="2" slots="0;1;2;3;4;5;6;7;8;9" teams="0;1;2;3;4;5" type="SOFT"/>
    </FairnessConstraints>
    <SeparationConstraints>
      <SE1 mode1="SLOTS" min="2" penalty="1" teams="0;1;2;3;4;5" type="SOFT"/>
    </SeparationConstraints>
  </Constraints>
</Instance>
"#;

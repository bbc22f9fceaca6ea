//! Listings shown in a fresh editor window.

pub const DEFAULT_SCRIPT: &str = r#"#!/usr/bin/env python3

print("Hello world!")

for no in range(10):
    print("Line number: %i" % no)
"#;

pub const DEFAULT_MCPI_SCRIPT: &str = r#"#!/usr/bin/env python3

from mcpi.minecraft import Minecraft

mc = Minecraft.create()
mc.postToChat("Hello world!")

playerPos = mc.player.getPos()
mc.player.setPos(playerPos.x, playerPos.y + 50, playerPos.z)
mc.postToChat("Don't look down :)")
"#;
